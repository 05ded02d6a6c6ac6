use rosterpix::{ClassSelector, OutputFormat, Roster, Row, TableRenderer};

fn main() -> anyhow::Result<()> {
    let roster = Roster::from_unsorted(vec![
        Row::new("2001", "Carl", "C2"),
        Row::new("1001", "Alice", "C1"),
        Row::new("1002", "Bob", "C1"),
    ]);

    let renderer = TableRenderer::default().with_format(OutputFormat::Png);
    for name in std::iter::once(ClassSelector::ALL.to_string()).chain(roster.class_names()) {
        let selector = ClassSelector::parse(&name);
        let rows = roster.filter(&selector);
        let image = renderer.render(rows, selector.is_all())?;
        let path = format!("{}.{}", selector, image.format.extension());
        std::fs::write(&path, &image.data)?;
        println!("{}: {} rows, {}x{}", path, rows.len(), image.width, image.height);
    }
    Ok(())
}
