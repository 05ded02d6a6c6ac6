use rosterpix::fetch::DirFetcher;
use rosterpix::{ClassSelector, LastModified, Roster, Row, TableRenderer, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let out = std::env::args().nth(1).unwrap_or_else(|| "site".to_string());
    let out = std::path::Path::new(&out);
    let roster = Roster::from_unsorted(vec![
        Row::new("2001", "Carl", "C2"),
        Row::new("1001", "Alice", "C1"),
        Row::new("1002", "Bob", "C1"),
    ]);

    let status = rosterpix::prerender::write_site(out, &roster, &[], LastModified::now(), &TableRenderer::default())?;
    println!("wrote {} images into {}", status.remains.len(), out.display());

    // Read it back the way a restricted in-app browser would
    let cfg = ViewerConfig {
        restricted: Some(true),
        fetch_prerendered_images: false,
        ..Default::default()
    };
    let mut session = rosterpix::session_with_fetcher(&cfg, Box::new(DirFetcher::new(out)))?;
    session.load()?;
    session.select(ClassSelector::parse("C1"))?;
    if let Some(lm) = session.last_modified() {
        println!("last modified {}", lm.display());
    }
    println!("C1: {:?} rows at {:?}", session.count(), session.current_url());
    Ok(())
}
