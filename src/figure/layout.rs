use super::genes::genes_within;
use super::params::{Color, PlotParams, BASE_COLORS, LINEAGE_COLORS};
use crate::sitefreq::{FrequencyTable, ReferenceSequence, SiteSummary};
use stackplot::{Anchor, Arrow, Connector, Figure, Label, Mark};

const LEFT_PAD: f64 = 5.0;
const RIGHT_PAD: f64 = 40.0;
const GENOME_Y: f64 = 20.0;
const COLUMN_TOP: f64 = 50.0;
const TRACK_HEIGHT: f64 = 30.0;
const GENOME_LINE_WIDTH: f64 = 6.0;
const COLUMN_SPACER: f64 = 5.0;
const BAR_HEIGHT: f64 = 100.0;
/// Depth at which the depth bar reaches full height
const DEPTH_CAP: f64 = 1000.0;
const LEGEND_FONT: f64 = 10.0;
const LEGEND_ENTRY_FONT: f64 = 8.0;
const SWATCH: f64 = 10.0;
const LEGEND_STEP: f64 = 12.0;

/// Vertical offsets of each figure row
struct Rows {
    fractions: f64,
    labels: f64,
    depth: f64,
    bases: f64,
}

impl Rows {
    fn new() -> Self {
        let fractions = COLUMN_TOP + TRACK_HEIGHT;
        let labels = fractions + BAR_HEIGHT + 1.0;
        let depth = labels + 30.0;
        let bases = depth + 130.0;
        Rows {
            fractions,
            labels,
            depth,
            bases,
        }
    }
}

/// Draws the genome map, one column per site and the legends.
///
/// Columns appear in table order; each is tied back to its genome coordinate.
pub fn plot_sites(
    table: &FrequencyTable,
    reference: &ReferenceSequence,
    lineages: (&str, &str),
    params: &PlotParams,
) -> Figure {
    let mut figure = Figure::new(params.page_width, params.page_height);
    let width = params.page_width - LEFT_PAD - RIGHT_PAD;
    let genome_len = reference.len().max(1) as f64;
    let rows = Rows::new();

    plot_genome_map(&mut figure, width, genome_len, reference.len());

    let num_sites = table.len();
    if num_sites == 0 {
        log::warn!("No sites selected; the figure only shows the genome map");
    } else {
        let column_width = (width - (num_sites - 1) as f64 * COLUMN_SPACER) / num_sites as f64;
        for (index, row) in table.rows.iter().enumerate() {
            let center = LEFT_PAD + index as f64 / num_sites as f64 * width + column_width / 2.0;
            let genome_x = LEFT_PAD + row.display_pos() as f64 / genome_len * width;
            log::trace!("Column {} at x={:.2} for position {}", index, center, row.display_pos());
            let column = Column {
                center,
                width: column_width,
                font_size: params.font_size,
            };
            column.plot(&mut figure, row, genome_x, &rows);
            if params.show_bases {
                column.plot_bases(&mut figure, row, reference, &rows);
            }
        }
    }

    plot_depth_guides(&mut figure, width, params, &rows);
    plot_lineage_legend(&mut figure, params.page_width, lineages);
    if params.show_bases {
        plot_base_legend(&mut figure, width, params, &rows);
    }
    figure
}

fn plot_genome_map(figure: &mut Figure, width: f64, genome_len: f64, genome_bases: u32) {
    figure.rule(
        (LEFT_PAD, GENOME_Y),
        (LEFT_PAD + width, GENOME_Y),
        GENOME_LINE_WIDTH,
    );
    for gene in genes_within(genome_bases) {
        let x = LEFT_PAD + gene.start as f64 / genome_len * width;
        let gene_width = gene.len() as f64 / genome_len * width;
        figure.push(Mark::Arrow(Arrow {
            x,
            y: GENOME_Y - TRACK_HEIGHT / 2.0 + 0.5,
            width: gene_width,
            height: TRACK_HEIGHT,
            fill: Color::Gene.to_string(),
        }));
        if gene_width > 10.0 {
            figure.label(
                Label::new(gene.name, x + 2.0, GENOME_Y + 8.0 / 3.0, 8.0)
                    .color(Color::White.to_string()),
            );
        }
    }
}

struct Column {
    center: f64,
    width: f64,
    font_size: f64,
}

impl Column {
    fn left(&self) -> f64 {
        self.center - self.width / 2.0
    }

    /// x of a vertical label hugging the column center
    fn text_x(&self) -> f64 {
        self.center - self.font_size / 3.0
    }

    fn stack(&self, figure: &mut Figure, top: f64, shares: &[f64], colors: &[Color]) {
        let mut y = top;
        for (share, color) in shares.iter().zip(colors) {
            let height = share * BAR_HEIGHT;
            figure.rect(self.left(), y, self.width, height, &color.to_string());
            y += height;
        }
    }

    fn plot(&self, figure: &mut Figure, row: &SiteSummary, genome_x: f64, rows: &Rows) {
        figure.push(Mark::Connector(Connector {
            points: vec![
                (genome_x, GENOME_Y - TRACK_HEIGHT / 2.0),
                (genome_x, GENOME_Y + TRACK_HEIGHT / 2.0),
                (self.center, COLUMN_TOP),
                (self.center, COLUMN_TOP + TRACK_HEIGHT / 2.0),
            ],
            stroke_width: 1.0,
            color: Color::Black.to_string(),
            opacity: 0.9,
        }));
        figure.label(
            Label::new(
                row.display_pos().to_string(),
                self.text_x(),
                COLUMN_TOP + TRACK_HEIGHT / 2.0 + 1.0,
                self.font_size,
            )
            .vertical(),
        );

        self.stack(figure, rows.fractions, &row.fractions_or_zero(), &LINEAGE_COLORS);
        figure.label(
            Label::new(row.site.label.as_str(), self.text_x(), rows.labels, self.font_size)
                .vertical(),
        );

        let depth_height = (row.depth as f64 / DEPTH_CAP * BAR_HEIGHT).min(BAR_HEIGHT);
        figure.rect(
            self.left(),
            rows.depth,
            self.width,
            depth_height,
            &Color::Depth.to_string(),
        );
        figure.label(
            Label::new(
                format!("{}x", row.depth),
                self.text_x(),
                rows.depth + depth_height + 1.0,
                self.font_size,
            )
            .vertical(),
        );
    }

    fn plot_bases(
        &self,
        figure: &mut Figure,
        row: &SiteSummary,
        reference: &ReferenceSequence,
        rows: &Rows,
    ) {
        let ref_base = reference
            .base_at(row.site.pos)
            .map(|b| (b as char).to_string())
            .unwrap_or_default();
        figure.label(
            Label::new(ref_base, self.center, rows.bases - 1.0, self.font_size)
                .anchor(Anchor::Middle),
        );
        let colors = BASE_COLORS.map(|(color, _)| color);
        self.stack(figure, rows.bases, &row.composition_or_zero(), &colors);
    }
}

fn plot_depth_guides(figure: &mut Figure, width: f64, params: &PlotParams, rows: &Rows) {
    let right = LEFT_PAD + width;
    for (depth, label) in [(0.0, "0x"), (100.0, "100x"), (1000.0, "1000x")] {
        let y = rows.depth + depth / DEPTH_CAP * BAR_HEIGHT;
        figure.rule((LEFT_PAD, y), (right, y), 1.0);
        figure.label(Label::new(label, right + 2.0, y, 6.0));
    }
    figure.label(
        Label::new(
            "Depth",
            params.page_width - RIGHT_PAD,
            rows.depth + BAR_HEIGHT / 2.0,
            LEGEND_FONT,
        )
        .anchor(Anchor::Middle)
        .vertical(),
    );
}

fn plot_legend(figure: &mut Figure, x: f64, top: f64, entries: &[(Color, &str)]) {
    figure.label(Label::new("Legend", x, top, LEGEND_FONT));
    for (index, (color, name)) in entries.iter().enumerate() {
        let y = top + 6.0 + index as f64 * LEGEND_STEP;
        figure.rect(x, y, SWATCH, SWATCH, &color.to_string());
        figure.label(Label::new(*name, x + SWATCH + 1.0, y + 8.0, LEGEND_ENTRY_FONT));
    }
}

fn plot_lineage_legend(figure: &mut Figure, page_width: f64, lineages: (&str, &str)) {
    let entries = [
        (LINEAGE_COLORS[0], lineages.0),
        (LINEAGE_COLORS[1], lineages.1),
        (LINEAGE_COLORS[2], "both"),
        (LINEAGE_COLORS[3], "other"),
    ];
    plot_legend(
        figure,
        page_width - RIGHT_PAD,
        COLUMN_TOP + TRACK_HEIGHT,
        &entries,
    );
}

fn plot_base_legend(figure: &mut Figure, width: f64, params: &PlotParams, rows: &Rows) {
    figure.label(Label::new(
        "Ref base",
        LEFT_PAD + width + 2.0,
        rows.bases - 1.0,
        params.font_size,
    ));
    plot_legend(
        figure,
        params.page_width - RIGHT_PAD,
        rows.bases + TRACK_HEIGHT,
        &BASE_COLORS,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::params::pick_params;
    use crate::sitefreq::{summarize, Allele, BaseCounts, VariantRecord};

    fn table() -> FrequencyTable {
        let mut counts = BaseCounts::new();
        counts.add(Allele::A, 60);
        counts.add(Allele::G, 20);
        FrequencyTable {
            rows: vec![
                summarize(&VariantRecord::new("S:E484K", 23012, "A", "G"), &counts),
                summarize(&VariantRecord::new("S:N501Y", 23062, "A", "T"), &BaseCounts::new()),
            ],
        }
    }

    fn reference() -> ReferenceSequence {
        ReferenceSequence::new("MN908947.3", &vec![b'g'; 29903])
    }

    fn labels(figure: &Figure) -> Vec<&str> {
        figure
            .marks
            .iter()
            .filter_map(|mark| match mark {
                Mark::Label(label) => Some(label.text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn columns_are_labelled_in_table_order() {
        let figure = plot_sites(&table(), &reference(), ("BA.2", "BA.5"), &pick_params(2, false));
        let labels = labels(&figure);
        let first = labels.iter().position(|&l| l == "S:E484K").unwrap();
        let second = labels.iter().position(|&l| l == "S:N501Y").unwrap();
        assert!(first < second);
        assert!(labels.contains(&"23013"));
        assert!(labels.contains(&"80x"));
        assert!(labels.contains(&"0x"));
        assert!(labels.contains(&"BA.2") && labels.contains(&"BA.5"));
        assert!(!labels.contains(&"Ref base"));
    }

    #[test]
    fn lineage_bar_heights_follow_fractions() {
        let figure = plot_sites(&table(), &reference(), ("BA.2", "BA.5"), &pick_params(2, false));
        let lineage_a = Color::LineageA.to_string();
        let heights: Vec<f64> = figure
            .marks
            .iter()
            .filter_map(|mark| match mark {
                Mark::Rect(rect) if rect.fill == lineage_a => Some(rect.height),
                _ => None,
            })
            .collect();
        // covered site, uncovered site, legend swatch
        assert_eq!(heights, [75.0, 0.0, SWATCH]);
    }

    #[test]
    fn base_panel_adds_reference_letters() {
        let figure = plot_sites(&table(), &reference(), ("BA.2", "BA.5"), &pick_params(2, true));
        let labels = labels(&figure);
        assert!(labels.contains(&"Ref base"));
        assert_eq!(labels.iter().filter(|&&l| l == "G").count(), 3);
        assert_eq!(figure.height, 600.0);
    }

    #[test]
    fn empty_table_still_draws_genome_map() {
        let figure = plot_sites(
            &FrequencyTable::default(),
            &reference(),
            ("BA.2", "BA.5"),
            &pick_params(0, false),
        );
        assert!(labels(&figure).contains(&"spike"));
        assert!(!figure
            .marks
            .iter()
            .any(|mark| matches!(mark, Mark::Connector(_))));
    }
}
