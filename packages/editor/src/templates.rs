//! Starter reports offered from the "examples" panel. Loading one replaces
//! the live report and starts a fresh history, like any other load.

use folio_model::{
    Block, BlockKind, BlockOptions, ChunkOptions, Column, HtmlStyling, OutputFormat, PdfStyling, ReportMetadata,
    Styling,
};

#[derive(Debug, Clone, Copy)]
pub struct ReportTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> (Vec<Block>, ReportMetadata),
}

impl ReportTemplate {
    /// Fresh copy of the template's blocks and metadata, dated today
    pub fn build(&self) -> (Vec<Block>, ReportMetadata) {
        (self.build)()
    }
}

const TEMPLATES: &[ReportTemplate] = &[
    ReportTemplate {
        id: "clinic",
        name: "Clinic Screening Summary",
        description: "HTML report with custom CSS, a two-column summary and an R chart.",
        build: clinic_report,
    },
    ReportTemplate {
        id: "observatory",
        name: "Observatory Log",
        description: "PDF report with a table of contents, numbered sections and a page break.",
        build: observatory_report,
    },
];

pub fn templates() -> &'static [ReportTemplate] {
    TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static ReportTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

fn column(id: &str, width: u32, blocks: Vec<Block>) -> Column {
    Column {
        blocks,
        ..Column::new(id, width)
    }
}

const CLINIC_CSS: &str = "h1 { color: #1f4e79; }
.callout { border-left: 4px solid #1f4e79; padding: 0.5rem 1rem; }";

fn clinic_report() -> (Vec<Block>, ReportMetadata) {
    let metadata = ReportMetadata {
        title: "Quarterly Screening Summary".to_string(),
        author: "Outpatient Clinic".to_string(),
        format: OutputFormat::Html,
        styling: Styling {
            html: Some(HtmlStyling {
                css_content: Some(CLINIC_CSS.to_string()),
            }),
            pdf: None,
        },
        ..ReportMetadata::untitled()
    };

    let blocks = vec![
        Block::text(
            "overview",
            "# Overview\n\nScreening volumes and follow-up rates for the last quarter.",
        ),
        Block::layout(
            "summary",
            vec![
                column(
                    "summary-left",
                    50,
                    vec![Block::new("callout", BlockKind::Html)
                        .with_content("<div class=\"callout\"><strong>1,248</strong> patients screened</div>")],
                ),
                column(
                    "summary-right",
                    50,
                    vec![Block::text(
                        "summary-notes",
                        "### Notes\nFollow-up within 30 days rose for the third quarter in a row.",
                    )],
                ),
            ],
        ),
        Block::code(
            "volume-chart",
            "r",
            "visits <- c(Jan = 402, Feb = 389, Mar = 457)\nbarplot(visits, main = \"Screenings per month\", col = \"steelblue\")",
        )
        .with_options(BlockOptions::with_chunk(ChunkOptions {
            echo: Some(false),
            ..ChunkOptions::default()
        })),
        Block::text("next-steps", "## Next steps\n\nExtend evening hours at the north site."),
    ];
    (blocks, metadata)
}

fn observatory_report() -> (Vec<Block>, ReportMetadata) {
    let metadata = ReportMetadata {
        title: "Observatory Log: Winter Session".to_string(),
        author: "Night Crew".to_string(),
        format: OutputFormat::Pdf,
        styling: Styling {
            html: None,
            pdf: Some(PdfStyling {
                toc: Some(true),
                number_sections: Some(true),
                margin: Some("1in".to_string()),
            }),
        },
        ..ReportMetadata::untitled()
    };

    let blocks = vec![
        Block::text(
            "intro",
            "# Session summary\n\nTwelve clear nights, mostly spent on open clusters.",
        ),
        Block::new("sky-photo", BlockKind::Image)
            .with_content("https://upload.wikimedia.org/wikipedia/commons/4/4e/Pleiades_large.jpg")
            .with_options(BlockOptions::with_caption("The Pleiades, photographed on the fourth night.")),
        Block::code(
            "magnitudes",
            "python",
            "import matplotlib.pyplot as plt\n\nnights = range(1, 13)\nseeing = [2.1, 1.8, 2.4, 1.6, 1.9, 2.2, 1.7, 1.5, 2.0, 1.8, 2.3, 1.6]\nplt.plot(nights, seeing)\nplt.ylabel(\"Seeing (arcsec)\")",
        )
        .with_options(BlockOptions::with_chunk(ChunkOptions {
            echo: Some(true),
            warning: Some(false),
            ..ChunkOptions::default()
        })),
        Block::new("break", BlockKind::PageBreak),
        Block::layout(
            "comparison",
            vec![
                column(
                    "observed",
                    50,
                    vec![Block::text("observed-text", "### Observed\nSeeing was best after midnight.")],
                ),
                column(
                    "expected",
                    50,
                    vec![Block::text("expected-text", "### Expected\nForecasts overestimated cloud cover.")],
                ),
            ],
        ),
    ];
    (blocks, metadata)
}
