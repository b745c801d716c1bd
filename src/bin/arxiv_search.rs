//! Cliente de terminal para el relay: misma sesión de búsqueda que la web.
//!
//! Órdenes: texto libre busca; `:max N`, `:pdf on|off`, `:history`, `:open N`,
//! `:download`, `:quit`.

use anyhow::{Context, Result};
use arxiv_relay::{
    models::DownloadFilename,
    ui::{RelayClient, SearchForm, SearchSession, UiError},
};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::error;
use tracing_subscriber::EnvFilter;
use url::Url;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let relay = std::env::var("RELAY_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let relay = Url::parse(&relay).with_context(|| format!("RELAY_URL inválida: {relay}"))?;
    let prefix = std::env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string());

    let client = RelayClient::new(reqwest::Client::new(), &relay, &prefix);
    let mut session = SearchSession::new(client).with_api_prefix(&prefix);
    let mut form = SearchForm::default();

    println!("arXiv-GPT · relay en {relay} (:quit para salir)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            ("", _) => continue,
            (":quit", _) => break,
            (":max", n) => match n.trim().parse() {
                Ok(n) => form.max_results = n,
                Err(_) => println!("Uso: :max <1-10>"),
            },
            (":pdf", flag) => form.generate_pdf = flag.trim() != "off",
            (":history", _) => print_history(&session),
            (":open", n) => {
                let restored = n
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .is_some_and(|i| session.select_history(i));
                if restored {
                    print_results(&session);
                } else {
                    println!("No existe esa entrada del historial.");
                }
            }
            (":download", _) => {
                if let Err(e) = download(&session).await {
                    error!("Descarga fallida: {e:#}");
                }
            }
            _ => {
                form.query = line.to_string();
                println!("Searching...");
                match session.submit(&form).await {
                    Ok(()) => print_results(&session),
                    Err(UiError::Validation(msg)) => println!("{msg}"),
                    Err(_) => println!("{}", session.error().unwrap_or("Failed to fetch papers")),
                }
            }
        }
    }
    Ok(())
}

fn print_results(session: &SearchSession<RelayClient>) {
    if session.display().is_empty() {
        println!("No papers to display. Try a new search.");
        return;
    }
    for item in session.display() {
        println!("{item}\n");
    }
    if let Some(name) = session.pdf_filename() {
        println!("PDF disponible: {name} (:download)");
    }
}

fn print_history(session: &SearchSession<RelayClient>) {
    if session.history().is_empty() {
        println!("No search history yet.");
    }
    for (i, entry) in session.history().iter().enumerate() {
        println!(
            "{:>2}. {}  [{}]",
            i + 1,
            entry.query,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

async fn download(session: &SearchSession<RelayClient>) -> Result<()> {
    let Some(name) = session.pdf_filename() else {
        println!("No hay PDF para descargar.");
        return Ok(());
    };
    let target = DownloadFilename::sanitize(name).unwrap_or_else(DownloadFilename::fallback);
    let response = session.backend().download_pdf(name).await?;

    let mut file = tokio::fs::File::create(target.as_str()).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    println!("Guardado en {}", target.as_str());
    Ok(())
}
