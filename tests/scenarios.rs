//! End-to-end filter + render scenarios on the three-row reference roster

use rosterpix::rendering::TableLayout;
use rosterpix::{ClassSelector, OutputFormat, Roster, RosterPayload, TableRenderer};

const DATA: &str = r#"{"formData":[["1001","Alice","x","y","C1"],["1002","Bob","x","y","C1"],["2001","Carl","x","y","C2"]],"lastModified":1614924187}"#;

fn roster() -> Roster {
    let payload = RosterPayload::from_json(DATA.as_bytes()).expect("payload");
    Roster::new(payload.form_data).expect("grouped roster")
}

fn renderer() -> TableRenderer {
    TableRenderer::default().with_format(OutputFormat::Png)
}

fn decode(data: &[u8]) -> image::RgbaImage {
    image::load_from_memory(data).expect("decode").to_rgba8()
}

#[test]
fn scenario_a_single_class_without_class_column() {
    let roster = roster();
    let rows = roster.filter(&ClassSelector::parse("C1"));
    assert_eq!(rows, &roster.rows()[0..2]);

    let image = renderer().render(rows, false).unwrap();
    let l = TableLayout::STANDARD;
    assert_eq!(image.width, l.id_width + l.name_width);
    assert_eq!(image.height, 3 * l.row_height);

    let px = decode(&image.data);
    assert_eq!(px.dimensions(), (image.width, image.height));
}

#[test]
fn scenario_b_all_classes_with_class_column() {
    let roster = roster();
    let selector = ClassSelector::All;
    let rows = roster.filter(&selector);
    assert_eq!(rows.len(), 3);
    let classes: Vec<&str> = rows.iter().map(|r| r.class_name.as_str()).collect();
    assert_eq!(classes, vec!["C1", "C1", "C2"]);

    let image = renderer().render(rows, selector.is_all()).unwrap();
    let l = TableLayout::STANDARD;
    assert_eq!(image.width, l.id_width + l.name_width + l.class_width);
    assert_eq!(image.height, 4 * l.row_height);

    // the name/class rule exists only with the class column
    let px = decode(&image.data);
    let boundary = l.id_width + l.name_width;
    assert_eq!(px.get_pixel(boundary, 12).0, [204, 204, 204, 255]);
}

#[test]
fn scenario_c_absent_class_is_header_only() {
    let roster = roster();
    let rows = roster.filter(&ClassSelector::parse("C9"));
    assert!(rows.is_empty());

    let image = renderer().render(rows, false).unwrap();
    assert_eq!(image.height, TableLayout::STANDARD.row_height);
    assert_eq!(image.width, 208);
}

#[test]
fn header_and_cells_leave_ink_in_every_column() {
    let roster = roster();
    let raster = renderer().rasterize(roster.rows(), true);
    let layout = TableLayout::STANDARD;
    for band in 0..4u32 {
        for col in layout.columns(true) {
            let y0 = band * layout.row_height + 1;
            let y1 = (band + 1) * layout.row_height - 1;
            let inked = (col.x + 1..col.right() - 1)
                .any(|x| (y0..y1).any(|y| raster.pixels.get_pixel(x, y).0[0] < 100));
            assert!(inked, "no text in band {} column at x={}", band, col.x);
        }
    }
}
