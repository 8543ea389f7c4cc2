use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use methanetree::{
    build_category_summary, build_comparison, build_product_summary, record, report, serve, Config,
    Controller, FoodCategory, JsonRenderer, NullRenderer, RenderPlan, Renderer, TerminalRenderer,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "methanetree")]
#[command(author, version, about = "Food emissions treemap: category summaries, product drill-down and a D3 viewer")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emissions per food category
    Summary {
        /// Data file (.csv or .json)
        data: PathBuf,

        /// Print the node set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Products of one category
    Drill {
        data: PathBuf,

        /// Category name as spelled in the data (Meat, vegetable, Grain, Fruit)
        category: String,

        #[arg(long)]
        json: bool,
    },

    /// Compare a product's emissions with beef, lamb and dairy
    Tooltip {
        data: PathBuf,
        category: String,
        product: String,
    },

    /// Per-stage emissions of a product next to beef and dairy herds
    Compare {
        data: PathBuf,
        product: String,

        #[arg(long)]
        json: bool,
    },

    /// Write a self-contained HTML treemap
    Report {
        data: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "methanetree.html")]
        output: PathBuf,
    },

    /// Start the interactive treemap viewer
    Serve {
        data: PathBuf,

        /// Port to listen on (default from config, 3100)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let args = Args::parse();
    let config = Config::load();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args.command, &config) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &Config) -> methanetree::Result<()> {
    match command {
        Command::Summary { data, json } => {
            let records = record::load(&data)?;
            let plan = RenderPlan::initial(build_category_summary(&records));
            if json {
                JsonRenderer::new(std::io::stdout()).render(&plan);
            } else {
                println!("{}", format!("Emissions by category ({} records)", records.len()).bold());
                TerminalRenderer::new(std::io::stdout(), config.chart.clone()).render(&plan);
            }
        }

        Command::Drill { data, category, json } => {
            let records = record::load(&data)?;
            let label = match FoodCategory::from_name(&category) {
                Some(cat) => cat.label().to_string(),
                None => {
                    tracing::warn!(%category, "not one of the treemap categories");
                    category.clone()
                }
            };
            let plan = RenderPlan::initial(build_product_summary(&records, &category)?);
            if json {
                JsonRenderer::new(std::io::stdout()).render(&plan);
            } else {
                println!("{}", format!("Products in {}", label).bold());
                TerminalRenderer::new(std::io::stdout(), config.chart.clone()).render(&plan);
            }
        }

        Command::Tooltip { data, category, product } => {
            let records = record::load(&data)?;
            // the controller only logs build failures, so surface them here
            build_product_summary(&records, &category)?;
            let mut widget = Controller::new(records, NullRenderer);
            widget.click(&category);
            let text = widget.tooltip_text(&product);
            if text.is_empty() {
                return Err(methanetree::Error::UnknownProduct(format!(
                    "{} in {}",
                    product, category
                )));
            }
            println!("{}", text);
        }

        Command::Compare { data, product, json } => {
            let records = record::load(&data)?;
            let chart = build_comparison(&records, &product)?;
            if json {
                JsonRenderer::new(std::io::stdout()).render_comparison(&chart);
            } else {
                TerminalRenderer::new(std::io::stdout(), config.chart.clone()).render_comparison(&chart);
            }
        }

        Command::Report { data, output } => {
            let records = record::load(&data)?;
            report::generate(&output, &records, &config.chart)?;
            eprintln!("{}", format!("Report saved: {}", output.display()).green());
        }

        Command::Serve { data, port } => {
            serve::start_viewer_server(&data, config, port.unwrap_or(config.serve.port))?;
        }

        Command::Completion { shell } => {
            let mut cmd = Args::command();
            clap_complete::generate(shell, &mut cmd, "methanetree", &mut std::io::stdout());
        }
    }
    Ok(())
}
