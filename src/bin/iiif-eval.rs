use std::path::PathBuf;

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method};
use clap::Parser;

use iiif_edge::config::loader::load_config;
use iiif_edge::config::EdgeConfig;
use iiif_edge::iiif::{EdgeRequest, Engine};

#[derive(Parser)]
#[command(name = "iiif-eval")]
#[command(about = "Evaluate one IIIF request offline and print the decision", long_about = None)]
struct Cli {
    /// Request path, e.g. /pug-life.jpg/full/full/0/default.jpg
    path: String,

    #[arg(short, long, default_value = "GET")]
    method: String,

    /// Accept header value
    #[arg(short, long)]
    accept: Option<String>,

    /// Extra request header as NAME:VALUE (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(HeaderName, HeaderValue)>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got {raw:?}"))?;
    let name = HeaderName::try_from(name.trim()).map_err(|e| e.to_string())?;
    let value = HeaderValue::try_from(value.trim()).map_err(|e| e.to_string())?;
    Ok((name, value))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::default(),
    };
    let engine = Engine::from_config(&config)?;

    let method = Method::from_bytes(cli.method.as_bytes())?;
    let mut headers = HeaderMap::new();
    if let Some(accept) = &cli.accept {
        headers.insert(axum::http::header::ACCEPT, HeaderValue::try_from(accept.as_str())?);
    }
    for (name, value) in cli.headers {
        headers.append(name, value);
    }

    let decision = engine.evaluate(&EdgeRequest {
        method: &method,
        path: &cli.path,
        headers: &headers,
    });

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}
