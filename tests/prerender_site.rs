//! A site written by the pre-renderer is readable by both fetch strategies

use rosterpix::fetch::DirFetcher;
use rosterpix::prerender::write_site;
use rosterpix::{ClassSelector, LastModified, OutputFormat, Roster, Row, TableRenderer, ViewerConfig};

fn roster() -> Roster {
    Roster::from_unsorted(vec![
        Row::new("2001", "Carl", "C2"),
        Row::new("1002", "Bob", "C1"),
        Row::new("1001", "Alice", "C1"),
    ])
}

#[test]
fn restricted_session_reads_prerendered_images() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = TableRenderer::default().with_format(OutputFormat::WebP(85));
    let status = write_site(dir.path(), &roster(), &[], LastModified(1614924187), &renderer).unwrap();
    assert_eq!(status.remains.len(), 3);

    let cfg = ViewerConfig {
        restricted: Some(true),
        ..Default::default()
    };
    let mut session = rosterpix::session_with_fetcher(&cfg, Box::new(DirFetcher::new(dir.path()))).unwrap();
    session.load().unwrap();
    assert_eq!(session.last_modified(), Some(LastModified(1614924187)));
    assert_eq!(session.count(), Some(3));
    assert_eq!(session.class_names(), vec!["ALL", "C1", "C2"]);

    session.select(ClassSelector::parse("C2")).unwrap();
    assert_eq!(session.count(), Some(1));
    let shown = session.current_image().unwrap();
    let expected = std::fs::read(dir.path().join("image/C2.webp")).unwrap();
    assert_eq!(shown.data, expected);
}

#[test]
fn live_session_matches_prerendered_counts() {
    let dir = tempfile::tempdir().unwrap();
    let renderer = TableRenderer::default().with_format(OutputFormat::Png);
    let status = write_site(dir.path(), &roster(), &[], LastModified(7), &renderer).unwrap();

    let cfg = ViewerConfig {
        restricted: Some(false),
        format: OutputFormat::Png,
        ..Default::default()
    };
    let mut session = rosterpix::session_with_fetcher(&cfg, Box::new(DirFetcher::new(dir.path()))).unwrap();
    session.load().unwrap();
    for name in session.class_names() {
        session.select(ClassSelector::parse(&name)).unwrap();
        assert_eq!(session.count(), Some(status.remains[&name]));
        // same renderer settings give the same bytes as the pre-rendered file
        let file = std::fs::read(dir.path().join(format!("image/{}.png", name))).unwrap();
        assert_eq!(session.current_image().unwrap().data, file);
    }
}
