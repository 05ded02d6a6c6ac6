/// Fixed table geometry: column widths, row bands, rule positions

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: u32,
    pub width: u32,
}

impl Column {
    pub fn center(&self) -> f32 {
        self.x as f32 + self.width as f32 / 2.0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }
}

/// Column widths and row height of the roster table.
///
/// Widths fit the longest expected id, name and class strings at the
/// default font size. Longer text is not wrapped or clipped and simply runs
/// past the rule line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub id_width: u32,
    pub name_width: u32,
    pub class_width: u32,
    pub row_height: u32,
    /// Distance from the bottom of a row band up to the text baseline.
    pub baseline_inset: u32,
}

impl TableLayout {
    pub const STANDARD: TableLayout = TableLayout {
        id_width: 122,
        name_width: 86,
        class_width: 102,
        row_height: 25,
        baseline_inset: 5,
    };

    pub fn width(&self, include_class: bool) -> u32 {
        self.id_width + self.name_width + if include_class { self.class_width } else { 0 }
    }

    /// Header band plus one band per row.
    pub fn height(&self, row_count: usize) -> u32 {
        (row_count as u32 + 1) * self.row_height
    }

    pub fn canvas_size(&self, row_count: usize, include_class: bool) -> (u32, u32) {
        (self.width(include_class), self.height(row_count))
    }

    /// Columns left to right: id, name and optionally class.
    pub fn columns(&self, include_class: bool) -> Vec<Column> {
        let mut cols = vec![
            Column { x: 0, width: self.id_width },
            Column { x: self.id_width, width: self.name_width },
        ];
        if include_class {
            cols.push(Column {
                x: self.id_width + self.name_width,
                width: self.class_width,
            });
        }
        cols
    }

    /// Baseline of band `band` (0 is the header).
    pub fn baseline(&self, band: usize) -> f32 {
        ((band as u32 + 1) * self.row_height - self.baseline_inset) as f32
    }

    /// Y of every horizontal rule, 0 through `height` inclusive.
    pub fn horizontal_rules(&self, row_count: usize) -> Vec<u32> {
        (0..=self.height(row_count)).step_by(self.row_height as usize).collect()
    }

    /// X of every vertical rule: left edge, column boundaries, right edge.
    pub fn vertical_rules(&self, include_class: bool) -> Vec<u32> {
        let mut xs = vec![0, self.id_width];
        if include_class {
            xs.push(self.id_width + self.name_width);
        }
        xs.push(self.width(include_class));
        xs
    }
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_depends_on_class_column() {
        let l = TableLayout::STANDARD;
        assert_eq!(l.width(false), 208);
        assert_eq!(l.width(true), 310);
    }

    #[test]
    fn height_counts_header_band() {
        let l = TableLayout::STANDARD;
        assert_eq!(l.height(0), 25);
        assert_eq!(l.height(3), 100);
    }

    #[test]
    fn rules_cover_every_boundary() {
        let l = TableLayout::STANDARD;
        assert_eq!(l.horizontal_rules(2), vec![0, 25, 50, 75]);
        assert_eq!(l.vertical_rules(false), vec![0, 122, 208]);
        assert_eq!(l.vertical_rules(true), vec![0, 122, 208, 310]);
    }

    #[test]
    fn column_centers_and_baselines() {
        let cols = TableLayout::STANDARD.columns(true);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].center(), 61.0);
        assert_eq!(cols[1].center(), 165.0);
        assert_eq!(cols[2].center(), 259.0);
        assert_eq!(TableLayout::STANDARD.baseline(0), 20.0);
        assert_eq!(TableLayout::STANDARD.baseline(2), 70.0);
    }
}
