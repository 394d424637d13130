use crate::config::Config;
use crate::discovery::{self, NamespaceSnapshot};
use crate::error::Result;
use crate::extract;
use crate::ingest::Ingestor;
use crate::session::Session;

/// Totals for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub kept: u64,
    pub skipped: u64,
}

/// Drives the full ingestion pipeline: namespace discovery, namespace
/// selection, chunk downloads and article ingestion, strictly one step at a
/// time. Any failure aborts the run where it happened.
pub struct SnapshotProcessor {
    config: Config,
    session: Session,
}

impl SnapshotProcessor {
    /// Create a new processor over an authenticated session
    pub fn new(config: Config, session: Session) -> Self {
        Self { config, session }
    }

    pub fn run(&self) -> Result<Stats> {
        // Step 1: discover every namespace snapshot for the project
        let snapshots = discovery::discover_namespaces(&self.session, &self.config.project)?;

        // Step 2: apply the namespace restriction. Skipped descriptors fetch
        // no chunks and create no directories.
        let selected: Vec<&NamespaceSnapshot> = snapshots
            .iter()
            .filter(|snapshot| self.config.wants_namespace(snapshot.namespace.identifier))
            .collect();

        if self.config.verbose {
            let ids: Vec<String> = selected
                .iter()
                .map(|snapshot| snapshot.namespace.identifier.to_string())
                .collect();
            println!("Dumping the following namespaces: {}", ids.join(", "));
        }

        // Step 3: stream every chunk of every selected namespace
        let project_dir = self.config.project_dir();
        let mut stats = Stats::default();

        for snapshot in selected {
            if self.config.verbose {
                println!(
                    "Processing namespace {} ({} chunks)...",
                    snapshot.namespace.identifier,
                    snapshot.chunks.len()
                );
            }

            let mut ingestor = Ingestor::new(
                &project_dir,
                snapshot.namespace.identifier,
                self.config.verbose,
            );

            for chunk_id in &snapshot.chunks {
                println!("Processing chunk {}/{}...", snapshot.identifier, chunk_id);
                extract::process_chunk(
                    &self.session,
                    &snapshot.identifier,
                    chunk_id,
                    |name, reader| {
                        println!("Found file {} in tarball", name);
                        ingestor.ingest_file(name, reader)
                    },
                )?;
            }

            stats.kept += ingestor.kept();
            stats.skipped += ingestor.skipped();
        }

        Ok(stats)
    }
}
