use anyhow::Result;
use chora_assets::AssetLoader;
use chora_geometry::{TextOptions, text_mesh};
use chora_render::{AppContext, DebugTextRenderer, FrameScheduler, RenderLoop};
use chora_scene::{PopulateConfig, Scene, place_objects, populate};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

const DEFAULT_FONT: &str = "/fonts/helvetiker_regular.typeface.json";

#[derive(Parser)]
#[command(name = "chora-cli", about = "Inspect the chora scene without a window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory asset paths are resolved against
    #[arg(long, default_value = "./static")]
    assets_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the randomized placements of the scattered solids
    Placements {
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Number of solids
        #[arg(short, long, default_value = "300")]
        count: usize,
    },
    /// Build an extruded text mesh and print its statistics
    Text {
        /// Typeface JSON font, relative to the assets directory
        #[arg(long, default_value = DEFAULT_FONT)]
        font: String,
        /// Text to extrude
        #[arg(long, default_value = "Chora Club")]
        text: String,
    },
    /// Populate a scene and render a few frames as text
    Frames {
        /// Typeface JSON font, relative to the assets directory
        #[arg(long, default_value = DEFAULT_FONT)]
        font: String,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Frames to render
        #[arg(short, long, default_value = "1")]
        frames: u32,
        /// List every object
        #[arg(long)]
        list: bool,
    },
}

/// Nothing to schedule without a window: the caller drives every frame.
struct Headless;

impl FrameScheduler for Headless {
    fn schedule_next(&mut self) {}
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let loader = AssetLoader::new(&cli.assets_dir);

    match cli.command {
        Commands::Info => {
            println!("chora-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", chora_assets::crate_info());
            println!("render: {}", chora_render::crate_info());
            println!("assets dir: {}", loader.root().display());
        }
        Commands::Placements { seed, count } => {
            let config = PopulateConfig {
                object_count: count,
                ..PopulateConfig::default()
            };
            let mut rng = StdRng::seed_from_u64(seed);
            println!("Placements: seed={seed}, count={count}");
            for p in place_objects(&config, &mut rng) {
                println!(
                    "{:>4} {:?} pos=({:>6.2}, {:>6.2}, {:>6.2}) rot=({:.3}, {:.3}, {:.3}) scale={:.3}",
                    p.index,
                    p.kind,
                    p.position.x,
                    p.position.y,
                    p.position.z,
                    p.rotation.x,
                    p.rotation.y,
                    p.rotation.z,
                    p.scale
                );
            }
        }
        Commands::Text { font, text } => {
            let typeface = loader.load_font(&font)?;
            let mut mesh = text_mesh(&typeface, &text, &TextOptions::default())?;
            let offset = mesh.center();
            println!("Font: {} ({} glyphs)", typeface.family_name(), typeface.glyph_count());
            println!(
                "Mesh: {} vertices, {} triangles",
                mesh.vertex_count(),
                mesh.triangle_count()
            );
            if let Some(bounds) = mesh.bounding_box() {
                let size = bounds.size();
                println!("Size: {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);
            }
            println!(
                "Centering offset: ({:.3}, {:.3}, {:.3})",
                offset.x, offset.y, offset.z
            );
        }
        Commands::Frames {
            font,
            seed,
            frames,
            list,
        } => {
            let typeface = loader.load_font(&font)?;
            let mut scene = Scene::new();
            let text_tex = scene.add_texture("textures/matcaps/9.jpg");
            let fill_tex = scene.add_texture("textures/matcaps/11.jpg");
            let text_material = scene.add_material("text", text_tex)?;
            let fill_material = scene.add_material("fill", fill_tex)?;
            let summary = populate(
                &mut scene,
                &typeface,
                text_material,
                fill_material,
                &PopulateConfig::default(),
                &mut StdRng::seed_from_u64(seed),
            )?;
            tracing::info!(
                "text object {} with {} triangles",
                summary.text.short(),
                summary.text_triangles
            );

            let mut ctx = AppContext::new(1280.0, 720.0, 1.0).with_scene(scene);
            let mut renderer = if list {
                DebugTextRenderer::verbose()
            } else {
                DebugTextRenderer::new()
            };
            let mut frame_loop = RenderLoop::new();
            for _ in 0..frames {
                if let Some(output) = frame_loop.tick(&mut ctx, &mut renderer, &mut Headless) {
                    print!("{output}");
                }
            }
        }
    }

    Ok(())
}
