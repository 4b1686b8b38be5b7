use crate::demo::{run_demo, DemoArgs};
use crate::orders::{run_generate, run_score, run_template, GenerateArgs, ScoreArgs, TemplateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use post_purchase_rules::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Smart Post-Purchase Rules",
    about = "Score e-commerce orders with explainable post-purchase recommendations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score, template and generate order CSV files
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },
    /// Score synthetic orders and print headline KPIs
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum OrdersCommand {
    /// Score an order CSV and write recommendations
    Score(ScoreArgs),
    /// Write the canonical input template
    Template(TemplateArgs),
    /// Write deterministic synthetic orders
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Orders { command } => match command {
            OrdersCommand::Score(args) => run_score(args),
            OrdersCommand::Template(args) => run_template(args),
            OrdersCommand::Generate(args) => run_generate(args),
        },
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_score_flags() {
        let cli = Cli::try_parse_from([
            "post-purchase-rules-api",
            "orders",
            "score",
            "--input",
            "orders.csv",
            "--map",
            "order_value=Cart Total",
            "--map",
            "order_id=Ref",
            "--conservative",
            "--default-window",
            "20",
            "--industry",
            "apparel",
        ])
        .expect("score flags parse");

        match cli.command {
            Some(Command::Orders {
                command: OrdersCommand::Score(args),
            }) => {
                assert_eq!(args.input.to_str(), Some("orders.csv"));
                assert_eq!(args.map.len(), 2);
                assert!(args.rules.conservative);
                assert!(!args.rules.disable_upsell);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_windows_outside_the_fixed_set() {
        let result = Cli::try_parse_from([
            "post-purchase-rules-api",
            "orders",
            "score",
            "--input",
            "orders.csv",
            "--default-window",
            "12",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["post-purchase-rules-api"]).expect("no args parse");
        assert!(cli.command.is_none());
    }
}
