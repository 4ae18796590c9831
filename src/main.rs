use tracing_subscriber::EnvFilter;

fn main() -> pmi_embedder::Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pmi_embedder=info")),
        )
        .init();

    pmi_embedder::Run::run()
}
