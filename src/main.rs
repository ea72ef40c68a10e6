use std::error::Error;
use std::fs;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use image::{ImageBuffer, Rgb};
use log::{error, info, LevelFilter};

mod raytracing;
use raytracing::colour::Colour;
use raytracing::error::RenderError;
use raytracing::parser::{ImageData, SceneParser};
use raytracing::tracer::{RayTracer, TraceFlags, DEFAULT_TRACE_LEVEL};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// the input path to the scene file
    scene: String,
    /// the path where the rendered image is saved, the format follows the extension
    #[arg(short, long, default_value = "output.bmp")]
    output: String,
    /// how many times a ray may bounce, refract or probe for shadows
    #[arg(short, long, default_value_t = DEFAULT_TRACE_LEVEL, value_parser = clap::value_parser!(i32).range(1..))]
    depth: i32,
    /// disable the ambient term
    #[arg(long)]
    no_ambient: bool,
    /// disable diffuse and specular lighting
    #[arg(long)]
    no_lighting: bool,
    #[arg(long)]
    no_shadows: bool,
    #[arg(long)]
    no_reflections: bool,
    #[arg(long)]
    no_refractions: bool,
    /// use an orthographic projection instead of a perspective one
    #[arg(long)]
    ortho: bool,
    /// apply gamma correction to the final image
    #[arg(long)]
    gamma_correction: bool,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

impl Args {
    fn trace_flags(&self) -> TraceFlags {
        let mut flags = TraceFlags::default();
        flags.set(TraceFlags::AMBIENT, !self.no_ambient);
        flags.set(TraceFlags::DIFFUSE_AND_SPECULAR, !self.no_lighting);
        flags.set(TraceFlags::SHADOW, !self.no_shadows);
        flags.set(TraceFlags::REFLECTION, !self.no_reflections);
        flags.set(TraceFlags::REFRACTION, !self.no_refractions);
        flags.set(TraceFlags::ORTHOGRAPHIC, self.ortho);
        flags
    }
}

fn gamma_correction(value: f64) -> f64 {
    if value > 0.0 {
        value.powf(1.0 / 2.2)
    } else {
        0.0
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let content = fs::read_to_string(&args.scene).map_err(|source| RenderError::SceneFile {
        path: args.scene.clone(),
        source,
    })?;
    let ImageData {
        width,
        height,
        camera,
        scene,
    } = match SceneParser::new(&content).parse_scene() {
        Ok(data) => data,
        Err(parser_error) => {
            if let Some(location) = parser_error.error_location(&content) {
                error!("in {}:\n{}", args.scene, location);
            }
            return Err(RenderError::from(parser_error).into());
        }
    };

    let tracer = RayTracer::new(args.trace_flags(), args.depth);
    let mut buffer: ImageBuffer<Rgb<u8>, Vec<_>> = ImageBuffer::new(width, height);

    // measure time
    let start = Instant::now();
    tracer.render(&scene, &camera, width, height, |column, row, colour: Colour| {
        let colour = if args.gamma_correction {
            colour.map(gamma_correction)
        } else {
            colour
        };
        // the tracer counts rows from the bottom, images from the top
        buffer.put_pixel(column, height - 1 - row, colour.into());
    });
    let total_time = start.elapsed();

    buffer.save(&args.output).map_err(RenderError::from)?;
    info!("Rendered {} in {:?}", args.output, total_time);
    Ok(())
}
