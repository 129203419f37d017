use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use product_crud::app::product::handler::{dispatch, Command, Flow, HELP};
use product_crud::app::product::view::render;
use product_crud::infrastructure::logger::init_logging;
use product_crud::{
    load_config, CatalogApi, Config, Confirm, DraftField, HttpCatalogClient, ProductCrud,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "product-crud", version, about = "Manage a remote product catalog")]
struct Cli {
    /// Path to a config file (default: config.toml or ./config/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog service base URL, overrides config and PRODUCT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Display title, overrides config and PRODUCT_APP_TITLE
    #[arg(long, global = true)]
    title: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Catalog(CatalogCommand),
    /// Write a config file with default values and the given overrides
    InitConfig {
        /// Destination file
        #[arg(long, default_value = "config/config.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Fetch and show all products
    List,
    /// Create a product
    Create(ProductFields),
    /// Update an existing product
    Update {
        /// Product id
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Interactive session (default)
    Shell,
}

#[derive(Args)]
struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    quantity: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl ProductFields {
    fn apply<A: CatalogApi>(self, crud: &mut ProductCrud<A>) {
        let fields = [
            (DraftField::Name, self.name),
            (DraftField::Price, self.price),
            (DraftField::Quantity, self.quantity),
            (DraftField::Description, self.description),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                crud.set_field(field, value);
            }
        }
    }
}

/// 终端确认对话框，默认否；无法交互时视为拒绝
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(Commands::InitConfig { path, force }) => {
            let mut config = Config::default();
            config.apply_env();
            config.apply_overrides(cli.api_url, cli.title);
            config.validate()?;
            config.write_to(&path, force)?;
            println!("wrote {}", path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Some(Commands::Catalog(command)) => command,
        None => CatalogCommand::Shell,
    };

    let (mut config, source) = load_config(cli.config.as_deref())?;
    config.apply_overrides(cli.api_url, cli.title);
    config.validate()?;

    let _guard = init_logging(&config.logging).context("日志初始化失败")?;
    info!("配置来源: {:?}，目录服务: {}", source, config.api.endpoint());

    let client = HttpCatalogClient::from_config(&config.api)?;
    let mut crud = ProductCrud::new(client).with_strict_list_shape(config.api.strict_list_shape);

    match command {
        CatalogCommand::List => crud.fetch_all().await,
        CatalogCommand::Create(fields) => {
            fields.apply(&mut crud);
            crud.submit().await;
        }
        CatalogCommand::Update { id, fields } => {
            crud.fetch_all().await;
            if crud.state().has_error() {
                return Ok(finish(&crud, &config));
            }
            match crud.find(&id).cloned() {
                Some(product) => {
                    crud.edit(product);
                    fields.apply(&mut crud);
                    crud.submit().await;
                }
                None => crud.report_error(format!("Product {} not found", id)),
            }
        }
        CatalogCommand::Delete { id, yes } => {
            crud.fetch_all().await;
            if crud.state().has_error() {
                return Ok(finish(&crud, &config));
            }
            match crud.resolve_id(&id) {
                Some(id) if yes => crud.delete_record(&id, &mut |_: &str| true).await,
                Some(id) => crud.delete_record(&id, &mut TerminalConfirm).await,
                None => crud.report_error(format!("Product {} not found", id)),
            }
        }
        CatalogCommand::Shell => {
            shell(&mut crud, &config).await?;
            return Ok(ExitCode::SUCCESS);
        }
    }

    Ok(finish(&crud, &config))
}

fn finish<A: CatalogApi>(crud: &ProductCrud<A>, config: &Config) -> ExitCode {
    print!("{}", render(crud.state(), &config.ui.title));
    if crud.state().has_error() {
        eprintln!("error: {}", crud.state().error);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn shell<A: CatalogApi>(crud: &mut ProductCrud<A>, config: &Config) -> anyhow::Result<()> {
    crud.fetch_all().await;
    print!("{}", render(crud.state(), &config.ui.title));
    println!("type `help` for commands");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match dispatch(crud, command, &mut TerminalConfirm).await {
            Flow::Continue => print!("{}", render(crud.state(), &config.ui.title)),
            Flow::ShowHelp => println!("{}", HELP),
            Flow::Quit => break,
        }
    }

    info!("会话结束");
    Ok(())
}
