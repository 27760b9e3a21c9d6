use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paypal_ipn::application::verifier::NotificationVerifier;
use paypal_ipn::domain::callback::CallbackFields;
use paypal_ipn::domain::ports::{ResolverBox, TransportBox};
use paypal_ipn::infrastructure::dns::SystemResolver;
use paypal_ipn::infrastructure::http::ReqwestTransport;
use paypal_ipn::interfaces::cli::{Cli, Command, VerifyArgs};
use std::io::{self, IsTerminal, Read};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Link(args) => {
            println!("{}", args.into_builder());
        }
        Command::Verify(args) => verify(args).await?,
    }

    Ok(())
}

async fn verify(args: VerifyArgs) -> Result<()> {
    let body = match &args.input {
        Some(path) => std::fs::read_to_string(path).into_diagnostic()?,
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body).into_diagnostic()?;
            body
        }
    };

    let fields = CallbackFields::from_form_body(&body).into_diagnostic()?;
    let config = args.config();
    let transport: TransportBox =
        Box::new(ReqwestTransport::new(config.timeout).into_diagnostic()?);
    let resolver: ResolverBox = Box::new(SystemResolver::new());
    let verifier = NotificationVerifier::new(config, transport, resolver);
    let payment = verifier
        .verify(&fields, args.remote_addr)
        .await
        .into_diagnostic()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&payment).into_diagnostic()?
    );
    Ok(())
}
