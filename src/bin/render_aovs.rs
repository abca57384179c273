use aovkit::aovs;
use aovkit::core::aov::AOVContainer;
use aovkit::core::aov_accumulator::AOVAccumulatorContainer;
use aovkit::core::frame::{Frame, TileBounds};
use aovkit::core::lighting::LightingConditions;
use aovkit::core::rng::LcgRng;
use aovkit::core::shading::{PixelContext, ShadingComponents, ShadingPoint, ShadingResult};
use aovkit::io::exr_utils;
use aovkit::math::bitmap::Bitmap;
use aovkit::math::constants::{Float, Int, Vector2f, Vector2i, Vector3f, EPSILON, INV_PI, PI};
use aovkit::math::spectrum::RGBSpectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

// Analytic stand-in for light transport: one lit sphere under a sky.
struct SphereScene {
    center: Vector3f,
    radius: Float,
    camera_origin: Vector3f,
    tan_half_fov: Float,
    light_dir: Vector3f,
    irradiance: Float,
    albedo: RGBSpectrum,
    specular: RGBSpectrum,
    sky: RGBSpectrum,
}

impl SphereScene {
    fn new() -> Self {
        Self {
            center: Vector3f::new(0.0, 0.0, 0.0),
            radius: 1.0,
            camera_origin: Vector3f::new(0.0, 0.0, 3.5),
            tan_half_fov: (40.0 * PI / 360.0).tan(),
            light_dir: Vector3f::new(-0.5, 0.8, 0.6).normalize(),
            irradiance: 3.0,
            albedo: RGBSpectrum::new(0.8, 0.3, 0.2),
            specular: RGBSpectrum::splat(0.4),
            sky: RGBSpectrum::new(0.1, 0.15, 0.3),
        }
    }

    fn shade(&self, frame: &Frame, film: Vector2f) -> (ShadingPoint, ShadingComponents) {
        let aspect = frame.width() as Float / frame.height() as Float;
        let x = (2.0 * film.x / frame.width() as Float - 1.0) * aspect * self.tan_half_fov;
        let y = (1.0 - 2.0 * film.y / frame.height() as Float) * self.tan_half_fov;
        let dir = Vector3f::new(x, y, -1.0).normalize();

        let t = match self.intersect(self.camera_origin, dir) {
            Some(t) => t,
            None => {
                let mut components = ShadingComponents::default();
                components.emission = self.sky * (0.5 + 0.5 * dir.y);
                components.rebuild_beauty();
                return (ShadingPoint::miss(), components);
            }
        };

        let p = self.camera_origin + dir * t;
        let n = (p - self.center) / self.radius;
        let u = (n.z.atan2(n.x) + PI) / (2.0 * PI);
        let v = n.y.max(-1.0).min(1.0).acos() * INV_PI;
        let point = ShadingPoint::new(p, n, n, Vector2f::new(u, v), t);

        let cos_theta = n.dot(&self.light_dir).max(0.0);
        let half = (self.light_dir - dir).normalize();
        let highlight = n.dot(&half).max(0.0).powi(48);

        let mut components = ShadingComponents::default();
        components.diffuse = self.albedo * (INV_PI * cos_theta * self.irradiance);
        components.glossy = self.specular * (highlight * cos_theta * self.irradiance);
        components.rebuild_beauty();
        components.alpha = 1.0;
        (point, components)
    }

    fn intersect(&self, origin: Vector3f, dir: Vector3f) -> Option<Float> {
        let oc = origin - self.center;
        let b = oc.dot(&dir);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        [-b - sqrt_disc, -b + sqrt_disc].iter().copied().find(|t| *t > EPSILON)
    }
}

struct RenderSettings {
    spp: u32,
    seed: u64,
}

fn render_tile(frame: &Frame,
               scene: &SphereScene,
               settings: &RenderSettings,
               accumulators: &mut AOVAccumulatorContainer,
               tile_x: usize,
               tile_y: usize) -> Vec<ShadingResult> {
    let bounds = frame.tile_bounds(tile_x, tile_y);
    let mut results = Vec::with_capacity(bounds.pixel_count());

    accumulators.on_tile_begin(frame, tile_x, tile_y);
    for y in bounds.y0..bounds.y1 {
        for x in bounds.x0..bounds.x1 {
            let mut rng = LcgRng::for_pixel(settings.seed, x, y);
            let mut sum = ShadingComponents::default();
            let mut estimate = sum;

            accumulators.on_pixel_begin();
            for s in 0..settings.spp {
                accumulators.on_sample_begin();
                let film = Vector2f::new(x as Float, y as Float) + rng.next_2d();
                let (point, sample) = scene.shade(frame, film);
                sum += sample;

                // Each write carries the pixel's running estimate.
                let inv_n = 1.0 / (s + 1) as Float;
                estimate = sum;
                estimate.alpha = sum.alpha * inv_n;
                let pixel_context = PixelContext::new(Vector2i::new(x as Int, y as Int), film);
                accumulators.write(&pixel_context, &point, &estimate, inv_n);
                accumulators.on_sample_end();
            }

            if !estimate.beauty.as_vector().iter().all(|c| c.is_finite()) {
                accumulators.beauty_mut().set_to_pink_linear_rgb();
            }

            let mut result = ShadingResult::default();
            accumulators.flush(&mut result);
            accumulators.on_pixel_end();
            results.push(result);
        }
    }
    accumulators.on_tile_end(frame, tile_x, tile_y);
    results
}

fn render(frame: &Frame, scene: &SphereScene, settings: &RenderSettings) -> (Bitmap, Vec<Bitmap>) {
    let width = frame.width();
    let height = frame.height();
    let tiles_x = frame.tile_count_x();
    let total_tiles = frame.tile_count();

    let mut main = Bitmap::new(width, height);
    let mut extras: Vec<Bitmap> = frame.aovs().iter().map(|_| Bitmap::new(width, height)).collect();

    let progress = ProgressBar::new(total_tiles as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let next_tile = Arc::new(AtomicUsize::new(0));
    let thread_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let (tx, rx) = mpsc::channel::<(TileBounds, Vec<ShadingResult>)>();

    thread::scope(|scope| {
        for _ in 0..thread_count {
            let next_tile = Arc::clone(&next_tile);
            let tx = tx.clone();
            scope.spawn(move || {
                let mut accumulators = AOVAccumulatorContainer::from_frame(frame);
                loop {
                    let tile_index = next_tile.fetch_add(1, Ordering::Relaxed);
                    if tile_index >= total_tiles {
                        break;
                    }

                    let tile_x = tile_index % tiles_x;
                    let tile_y = tile_index / tiles_x;
                    let results = render_tile(frame, scene, settings, &mut accumulators, tile_x, tile_y);
                    if tx.send((frame.tile_bounds(tile_x, tile_y), results)).is_err() {
                        break;
                    }
                }
            });
        }

        drop(tx);
        for (bounds, results) in rx.iter() {
            let mut pixel = 0;
            for y in bounds.y0..bounds.y1 {
                for x in bounds.x0..bounds.x1 {
                    let result = &results[pixel];
                    main[(x, y)] = result.main;
                    for (i, extra) in extras.iter_mut().enumerate() {
                        extra[(x, y)] = result.aovs[i];
                    }
                    pixel += 1;
                }
            }
            progress.inc(1);
        }
    });
    progress.finish_and_clear();

    (main, extras)
}

fn build_aovs(names: &str) -> AOVContainer {
    let mut container = AOVContainer::new();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match aovs::create_aov(name) {
            Some(aov) => {
                if let Err(e) = container.insert(aov) {
                    log::warn!("Skipping AOV '{}': {}.", name, e);
                }
            }
            None => log::warn!("Unknown AOV '{}', skipped.", name),
        }
    }
    container
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output_dir> [--width N] [--height N] [--spp N] [--tile N] [--seed N] [--aovs a,b,c] [--lighting standard|rec2020]", args[0]);
        std::process::exit(1);
    }

    let output_dir = Path::new(&args[1]);
    let mut width: usize = 320;
    let mut height: usize = 240;
    let mut tile_size: usize = 32;
    let mut settings = RenderSettings { spp: 16, seed: 0 };
    let mut aov_names = aovs::AOV_MODELS.join(",");
    let mut lighting = LightingConditions::standard();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(height);
            }
            "--spp" => {
                i += 1;
                settings.spp = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(settings.spp).max(1);
            }
            "--tile" => {
                i += 1;
                tile_size = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(tile_size);
            }
            "--seed" => {
                i += 1;
                settings.seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(settings.seed);
            }
            "--aovs" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    aov_names = v.clone();
                }
            }
            "--lighting" => {
                i += 1;
                lighting = match args.get(i).map(|v| v.as_str()) {
                    Some("rec2020") => LightingConditions::rec2020_to_rec709(),
                    _ => LightingConditions::standard(),
                };
            }
            other => log::warn!("Ignoring unknown argument '{}'.", other),
        }
        i += 1;
    }

    if width == 0 || height == 0 {
        eprintln!("Resolution must be non-zero, got {}x{}.", width, height);
        std::process::exit(2);
    }

    let frame = Frame::new(width, height)
        .with_tile_size(tile_size, tile_size)
        .with_lighting_conditions(lighting)
        .with_aovs(build_aovs(&aov_names));
    log::info!("Rendering {}x{} at {} spp with {} AOVs in {} tiles.",
               width, height, settings.spp, frame.aovs().len(), frame.tile_count());

    let scene = SphereScene::new();
    let (main, extras) = render(&frame, &scene, &settings);

    if let Err(e) = std::fs::create_dir_all(output_dir) {
        eprintln!("Failed to create {}: {}", output_dir.display(), e);
        std::process::exit(3);
    }

    let mut outputs = vec![("beauty".to_string(), &main)];
    for (aov, image) in frame.aovs().iter().zip(extras.iter()) {
        outputs.push((aov.name().to_string(), image));
    }
    for (name, image) in outputs {
        let path = output_dir.join(format!("{}.exr", name));
        if exr_utils::write_exr_to_file(image, &path.to_string_lossy()).is_err() {
            std::process::exit(4);
        }
    }
}
