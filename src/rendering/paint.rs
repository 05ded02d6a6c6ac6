/// Display list for a roster table, in drawing order

use crate::rendering::layout::TableLayout;
use crate::roster::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(0xff, 0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba(0, 0, 0, 0xff);
    pub const RULE: Rgba = Rgba(0xcc, 0xcc, 0xcc, 0xff);
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Cover the whole canvas.
    Fill { rgba: Rgba },
    /// Full-width rule at `y`.
    HorizontalRule { y: u32, rgba: Rgba },
    /// Full-height rule at `x`.
    VerticalRule { x: u32, rgba: Rgba },
    /// Text centred on `center_x` with its baseline at `baseline`.
    Text {
        center_x: f32,
        baseline: f32,
        text: String,
        rgba: Rgba,
    },
}

/// Colours and header labels of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub background: Rgba,
    pub rule: Rgba,
    pub text: Rgba,
    pub id_label: String,
    pub name_label: String,
    pub class_label: String,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            rule: Rgba::RULE,
            text: Rgba::BLACK,
            id_label: "ID".to_string(),
            name_label: "Name".to_string(),
            class_label: "Class".to_string(),
        }
    }
}

/// Build the commands for a table: background, horizontal rules, vertical
/// rules, header labels, then one text triple (or pair) per row.
pub fn build_display_list(
    layout: &TableLayout,
    style: &TableStyle,
    rows: &[Row],
    include_class: bool,
) -> Vec<PaintCommand> {
    let columns = layout.columns(include_class);
    let mut cmds = Vec::with_capacity(8 + rows.len() * (columns.len() + 1));

    cmds.push(PaintCommand::Fill { rgba: style.background });

    for y in layout.horizontal_rules(rows.len()) {
        cmds.push(PaintCommand::HorizontalRule { y, rgba: style.rule });
    }
    for x in layout.vertical_rules(include_class) {
        cmds.push(PaintCommand::VerticalRule { x, rgba: style.rule });
    }

    let band = |cmds: &mut Vec<PaintCommand>, index: usize, cells: [&str; 3]| {
        let baseline = layout.baseline(index);
        for (col, text) in columns.iter().zip(cells) {
            cmds.push(PaintCommand::Text {
                center_x: col.center(),
                baseline,
                text: text.to_string(),
                rgba: style.text,
            });
        }
    };

    band(&mut cmds, 0, [style.id_label.as_str(), style.name_label.as_str(), style.class_label.as_str()]);
    for (i, row) in rows.iter().enumerate() {
        band(&mut cmds, i + 1, [row.id.as_str(), row.name.as_str(), row.class_name.as_str()]);
    }

    cmds
}
