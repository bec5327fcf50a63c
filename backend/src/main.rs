use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;

const MIGRATIONS: diesel_async_migrations::EmbeddedMigrations = diesel_async_migrations::embed_migrations!("../migrations/");

async fn run_migrations(connection: &mut diesel_async::AsyncPgConnection) {
    MIGRATIONS.run_pending_migrations(connection).await.unwrap();
}

#[derive(clap::Parser, Debug)]
struct Args {
    /// Demo files to ingest
    files: Vec<std::path::PathBuf>,
    /// Platform the demos came from (matchmaking, faceit, esea)
    #[arg(long)]
    source: Option<String>,
    /// Map name override for demos with a missing or broken header
    #[arg(long)]
    map: Option<String>,
}

#[tokio::main]
async fn main() {
    let registry = tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target().contains("backend") || meta.target().contains("ingest")
        }));
    tracing::subscriber::set_global_default(registry).unwrap();

    let args = <Args as clap::Parser>::parse();

    tracing::info!("Applying Migrations");
    run_migrations(&mut backend::db_connection().await).await;
    tracing::info!("Completed Migrations");

    // Distinct files run on independent pipelines; the dedup keeps one file
    // from ever being handed to two pipelines at once.
    let mut files = args.files;
    files.sort();
    files.dedup();

    let mut tasks = tokio::task::JoinSet::new();
    for path in files {
        let source = args.source.clone();
        let map = args.map.clone();

        tasks.spawn(async move {
            let status = ingest::progress::StatusHandle::new(path.display().to_string());

            let reporter = {
                let status = status.clone();
                tokio::task::spawn(async move {
                    let mut interval = tokio::time::interval(std::time::Duration::from_secs(5));
                    loop {
                        interval.tick().await;

                        let snapshot = status.snapshot();
                        if snapshot.is_parsing {
                            tracing::info!(
                                "{}: {:.0}%",
                                snapshot.file_name,
                                snapshot.progress * 100.0
                            );
                        }
                    }
                })
            };

            let ok = backend::pipeline::parse_demo_file(
                &path,
                source.as_deref(),
                map.as_deref(),
                &status,
            )
            .await;
            reporter.abort();

            (path, ok)
        });
    }

    let mut failed = 0_usize;
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok((path, true)) => {
                tracing::info!("Finished {:?}", path);
            }
            Ok((path, false)) => {
                failed += 1;
                tracing::error!("Failed {:?}", path);
            }
            Err(e) => {
                failed += 1;
                tracing::error!("Parse task panicked: {:?}", e);
            }
        };
    }

    if failed > 0 {
        std::process::exit(1);
    }
}
