use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rosterpix::{ClassSelector, LastModified, OutputFormat, Roster, RosterPayload, ViewerConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rosterpix", version, about = "Render class rosters into table images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one class of a local data.json into an image file
    Render {
        /// Roster dump (`{"formData": [...], "lastModified": ...}`)
        #[arg(long)]
        data: PathBuf,
        /// Class to show; ALL shows every class with a class column
        #[arg(long, default_value = ClassSelector::ALL)]
        class: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Write data.json, image/{class}.webp and image/status.json for a roster
    Prerender {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Comma separated classes; defaults to ALL plus every class in the data
        #[arg(long, value_delimiter = ',')]
        classes: Vec<String>,
        /// Sort rows by class and id before grouping
        #[arg(long)]
        sort: bool,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// List the classes of a local data.json
    Classes {
        #[arg(long)]
        data: PathBuf,
    },
    /// Fetch from a deployed site like a browser would and save the shown image
    View(ViewArgs),
}

#[derive(Args)]
struct ViewArgs {
    #[arg(long)]
    base_url: String,
    /// Class to select; the stored selection is used when omitted
    #[arg(long)]
    class: Option<String>,
    #[arg(long)]
    user_agent: Option<String>,
    /// Force pre-rendered (true) or live (false) mode
    #[arg(long)]
    restricted: Option<bool>,
    /// JSON file remembering the selected class between runs
    #[arg(long)]
    store: Option<PathBuf>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args)]
struct RenderArgs {
    /// webp, png or jpeg
    #[arg(long, default_value = "webp")]
    format: String,
    #[arg(long, default_value_t = rosterpix::rendering::encode::DEFAULT_QUALITY)]
    quality: u8,
    /// TrueType/OpenType font file; the built-in bitmap font otherwise
    #[arg(long)]
    font: Option<PathBuf>,
    #[arg(long, default_value_t = 18.0)]
    font_size: f32,
    /// Header labels for the id, name and class columns, comma separated
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    labels: Vec<String>,
}

impl RenderArgs {
    fn apply(&self, config: &mut ViewerConfig) -> anyhow::Result<()> {
        let format: OutputFormat = self.format.parse()?;
        config.format = format.with_quality(self.quality);
        config.font_path = self.font.clone();
        config.font_size = self.font_size;
        match self.labels.as_slice() {
            [] => {}
            [id, name, class] => {
                config.style.id_label = id.clone();
                config.style.name_label = name.clone();
                config.style.class_label = class.clone();
            }
            other => bail!("--labels takes three labels, got {}", other.len()),
        }
        Ok(())
    }
}

fn read_payload(path: &Path) -> anyhow::Result<RosterPayload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(RosterPayload::from_json(&bytes)?)
}

fn write_output(path: Option<PathBuf>, default_name: String, data: &[u8]) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from(default_name));
    std::fs::write(&path, data).with_context(|| format!("writing {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render { data, class, output, render } => {
            let mut config = ViewerConfig::default();
            render.apply(&mut config)?;
            let renderer = rosterpix::build_renderer(&config)?;
            let roster = Roster::new(read_payload(&data)?.form_data)?;
            let selector = ClassSelector::parse(class.trim());
            let rows = roster.filter(&selector);
            let image = renderer.render(rows, selector.is_all())?;
            log::info!("{} rows, {}x{}", rows.len(), image.width, image.height);
            write_output(output, format!("{}.{}", selector, config.format.extension()), &image.data)
        }
        Command::Prerender {
            data,
            out,
            classes,
            sort,
            render,
        } => {
            let mut config = ViewerConfig::default();
            render.apply(&mut config)?;
            let renderer = rosterpix::build_renderer(&config)?;
            let payload = read_payload(&data)?;
            let roster = if sort {
                Roster::from_unsorted(payload.form_data)
            } else {
                Roster::new(payload.form_data)?
            };
            let lm = if payload.last_modified > 0 {
                LastModified(payload.last_modified)
            } else {
                LastModified::now()
            };
            let status = rosterpix::prerender::write_site(&out, &roster, &classes, lm, &renderer)?;
            for (class, count) in &status.remains {
                println!("{}\t{}", class, count);
            }
            Ok(())
        }
        Command::Classes { data } => {
            let payload = read_payload(&data)?;
            let roster = Roster::new(payload.form_data)?;
            for class in roster.class_names() {
                println!("{}", class);
            }
            Ok(())
        }
        Command::View(args) => view(args),
    }
}

#[cfg(feature = "http")]
fn view(args: ViewArgs) -> anyhow::Result<()> {
    let mut config = ViewerConfig {
        base_url: args.base_url,
        restricted: args.restricted,
        store_path: args.store,
        ..Default::default()
    };
    if let Some(ua) = args.user_agent {
        config.user_agent = ua;
    }
    args.render.apply(&mut config)?;

    let mut session = rosterpix::new_session(config)?;
    if let Some(class) = args.class {
        session.select(ClassSelector::parse(class.trim()))?;
    }
    session.load()?;

    if let Some(lm) = session.last_modified() {
        println!("last modified: {} ({})", lm.display(), lm.iso());
    }
    if let Some(count) = session.count() {
        println!("rows: {}", count);
    }
    let Some(image) = session.current_image() else {
        bail!("nothing to display");
    };
    write_output(
        args.output,
        format!("{}.{}", session.selector(), image.format.extension()),
        &image.data,
    )
}

#[cfg(not(feature = "http"))]
fn view(_args: ViewArgs) -> anyhow::Result<()> {
    bail!("built without the `http` feature")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("rosterpix: {:#}", e);
        std::process::exit(1);
    }
}
