use inkpath::{Affine, Draw, DrawResult, PixelMode, parse_symbol};
use std::env;
use std::process;

struct Options {
    source: String,
    output: String,
    width: u32,
    height: u32,
    mode: PixelMode,
    scale: f64,
    pen: Option<(String, f32)>,
    brush: Option<String>,
    background: Option<String>,
    translate: Option<(f64, f64)>,
    antialias: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Path Renderer");
    eprintln!("Usage: {} <path-data> <output.png> [options]", program);
    eprintln!("\nOptions:");
    eprintln!("  --size WxH            Canvas size in pixels (default 256x256)");
    eprintln!("  --mode MODE           Pixel layout: L, RGB, BGR, RGBA, BGRA (default RGB)");
    eprintln!("  --scale S             Multiply every path coordinate by S");
    eprintln!("  --pen COLOR[:WIDTH]   Outline color and width (default black:1)");
    eprintln!("  --brush COLOR         Fill color");
    eprintln!("  --background COLOR    Canvas color (default white)");
    eprintln!("  --translate DX,DY     Offset applied to the path");
    eprintln!("  --no-pen              Fill only");
    eprintln!("  --no-aa               Disable anti-aliasing");
    process::exit(1);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn parse_pair<T: std::str::FromStr>(value: &str, sep: char) -> Option<(T, T)> {
    let (a, b) = value.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_args(args: &[String]) -> Options {
    if args.len() < 3 {
        usage(&args[0]);
    }

    let mut options = Options {
        source: args[1].clone(),
        output: args[2].clone(),
        width: 256,
        height: 256,
        mode: PixelMode::Rgb,
        scale: 1.0,
        pen: Some(("black".to_string(), 1.0)),
        brush: None,
        background: None,
        translate: None,
        antialias: true,
    };

    let mut rest = args[3..].iter();
    while let Some(flag) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .unwrap_or_else(|| fail(format!("{} requires a value", flag)))
        };

        match flag.as_str() {
            "--size" => {
                let v = value();
                let (w, h) = parse_pair(&v, 'x')
                    .unwrap_or_else(|| fail(format!("bad size '{}', expected WxH", v)));
                options.width = w;
                options.height = h;
            }
            "--mode" => options.mode = value().parse().unwrap_or_else(|e| fail(e)),
            "--scale" => {
                let v = value();
                options.scale = v
                    .parse()
                    .unwrap_or_else(|_| fail(format!("bad scale '{}'", v)));
            }
            "--pen" => {
                let v = value();
                options.pen = Some(match v.rsplit_once(':') {
                    Some((color, width)) => {
                        let width = width
                            .parse()
                            .unwrap_or_else(|_| fail(format!("bad pen width '{}'", width)));
                        (color.to_string(), width)
                    }
                    None => (v, 1.0),
                });
            }
            "--brush" => options.brush = Some(value()),
            "--background" => options.background = Some(value()),
            "--translate" => {
                let v = value();
                options.translate = Some(
                    parse_pair(&v, ',')
                        .unwrap_or_else(|| fail(format!("bad offset '{}', expected DX,DY", v))),
                );
            }
            "--no-pen" => options.pen = None,
            "--no-aa" => options.antialias = false,
            other => {
                eprintln!("Error: unknown option {}", other);
                usage(&args[0]);
            }
        }
    }

    options
}

fn render(options: &Options) -> DrawResult<()> {
    let path = parse_symbol(&options.source, options.scale)?;
    log::info!(
        "parsed {} commands, bounds {:?}",
        path.len(),
        path.bounding_box()
    );

    let mut draw = Draw::new(options.mode, options.width, options.height, None)?;
    if let Some(name) = &options.background {
        let background = draw.resolve_color(&name.as_str().into(), 255)?;
        draw.clear(Some(background));
    }

    draw.set_antialias(options.antialias);
    if let Some((dx, dy)) = options.translate {
        draw.set_transform(Some(Affine::translate(dx, dy)));
    }

    let pen = match &options.pen {
        Some((color, width)) => Some(draw.pen(color.as_str(), *width, 255)?),
        None => None,
    };
    let brush = match &options.brush {
        Some(color) => Some(draw.brush(color.as_str(), 255)?),
        None => None,
    };

    draw.path(&path, pen.as_ref(), brush.as_ref())?;
    draw.save_png(&options.output)?;
    log::info!(
        "wrote {}x{} {} image to {}",
        options.width,
        options.height,
        options.mode,
        options.output
    );
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    if let Err(e) = render(&options) {
        fail(e);
    }
}
