mod config;

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use config::GeneratorConfig;
use terragen_proto::section;
use terragen_world::generator::TerrainGenerator;
use terragen_world::store::ChunkStore;
use tracing::{debug, info};

fn main() {
    let config = match GeneratorConfig::load("terragen.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load terragen.toml: {e}");
            process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "terragen v{} (seed: {})",
        env!("CARGO_PKG_VERSION"),
        config.world.seed
    );

    let out_dir = PathBuf::from(&config.output.directory);
    if let Err(e) = fs::create_dir_all(&out_dir) {
        eprintln!("Failed to create {}: {e}", out_dir.display());
        process::exit(1);
    }

    let generator = TerrainGenerator::new(config.world.seed);
    let mut store = ChunkStore::new();

    let center_x = config.generate.center_x;
    let center_z = config.generate.center_z;
    let radius = config.generate.radius;
    info!(
        "generating {}x{} chunks around ({center_x}, {center_z})",
        2 * radius + 1,
        2 * radius + 1
    );

    let started = Instant::now();
    let mut handles = Vec::new();
    for chunk_x in (center_x - radius)..=(center_x + radius) {
        for chunk_z in (center_z - radius)..=(center_z + radius) {
            let chunk = generator.generate_chunk(chunk_x, chunk_z);
            debug!(
                "chunk ({chunk_x}, {chunk_z}): {} sections",
                chunk.section_count()
            );
            handles.push(store.insert(chunk));
        }
    }
    info!(
        "generated {} chunks in {:.2?}",
        store.len(),
        started.elapsed()
    );

    let mut biome_histogram: HashMap<&'static str, usize> = HashMap::new();
    let mut written_bytes = 0usize;
    for handle in handles {
        let chunk = match store.get(handle) {
            Ok(chunk) => chunk,
            Err(e) => {
                eprintln!("Lost track of a generated chunk: {e}");
                process::exit(1);
            }
        };
        let (x, z) = chunk.coordinates();

        for lz in 0..16 {
            for lx in 0..16 {
                *biome_histogram.entry(chunk.biome(lx, lz).name()).or_default() += 1;
            }
        }

        let buffers = section::encode_chunk(chunk);
        let mut payload = Vec::with_capacity(buffers.len() * section::SECTION_WIRE_BYTES);
        for buffer in &buffers {
            payload.extend_from_slice(buffer);
        }

        let path = out_dir.join(format!("chunk_{x}_{z}.bin"));
        if let Err(e) = fs::write(&path, &payload) {
            eprintln!("Failed to write {}: {e}", path.display());
            process::exit(1);
        }
        written_bytes += payload.len();
        debug!(
            "wrote {} ({} sections, {} bytes)",
            path.display(),
            buffers.len(),
            payload.len()
        );
    }

    let mut biomes: Vec<_> = biome_histogram.into_iter().collect();
    biomes.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, columns) in biomes {
        info!("biome {name}: {columns} columns");
    }
    info!(
        "wrote {written_bytes} bytes to {} in {:.2?}",
        out_dir.display(),
        started.elapsed()
    );
}
