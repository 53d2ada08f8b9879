use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_caption_client::ui::{self, TerminalView};
use youtube_caption_client::{
    output, Action, BackendClient, Cli, Commands, Config, OembedClient, Outcome,
    WorkflowController,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "youtube_caption_client=debug"
    } else {
        "youtube_caption_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Extract {
            url,
            output: output_file,
            copy,
            download,
        } => {
            let backend = BackendClient::new(config.api_base_url(cli.local));
            let view = TerminalView::new(config.confirm_duration(), cli.quiet, false);
            let mut controller = WorkflowController::new(backend, OembedClient::new(), view)
                .with_download_dir(config.app.download_dir.clone());

            match controller.handle(Action::Extract { url }).await {
                Outcome::Completed => {
                    let captions = controller.state().captions.clone();

                    match output_file {
                        Some(path) => {
                            output::save_to_path(&captions, &path)?;
                            println!("Captions saved to: {}", path.display());
                        }
                        None if !download => println!("{}", captions),
                        None => {}
                    }

                    if copy {
                        controller.handle(Action::Copy).await;
                    }
                    if download {
                        controller.handle(Action::Download).await;
                    }
                }
                _ => anyhow::bail!("caption extraction failed"),
            }
        }
        Commands::Session => {
            let backend = BackendClient::new(config.api_base_url(cli.local));
            let view = TerminalView::new(config.confirm_duration(), cli.quiet, true);
            let mut controller = WorkflowController::new(backend, OembedClient::new(), view)
                .with_download_dir(config.app.download_dir.clone());

            ui::run_session(&mut controller).await?;
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file to change settings:");
                if let Some(dir) = dirs::config_dir() {
                    println!("  {}", dir.join("ytcap").join("config.yaml").display());
                }
            }
        }
    }

    Ok(())
}
