//! Path Rendering Example
//!
//! Draws a small scene with every primitive and saves it as PNG.
//!
//! Usage:
//!     cargo run --example render -- output.png
//!
//! Set RUST_LOG=debug to see the render passes.

use inkpath_core::{Draw, PixelMode, parse_symbol};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.png>", args[0]);
        std::process::exit(1);
    }

    let mut draw = Draw::new(PixelMode::Rgba, 320, 240, None)?;
    let pen = draw.pen("#202020", 3.0, 255)?;
    let thin = draw.pen("gray", 1.0, 255)?;
    let fill = draw.brush("skyblue", 255)?;
    let accent = draw.brush("tomato", 180)?;

    draw.rectangle([10.0, 10.0, 110.0, 80.0], Some(&pen), Some(&fill))?;
    draw.ellipse([130.0, 10.0, 230.0, 80.0], Some(&pen), Some(&accent))?;
    draw.pieslice([240.0, 10.0, 310.0, 80.0], 30.0, 300.0, Some(&thin), Some(&fill))?;
    draw.chord([10.0, 100.0, 110.0, 170.0], 0.0, 180.0, Some(&pen), Some(&accent))?;
    draw.arc([130.0, 100.0, 230.0, 170.0], 200.0, 340.0, Some(&pen))?;
    draw.line(&[240, 100, 310, 170, 240, 170], Some(&pen))?;

    let star = parse_symbol("M0,-12 L7,10 L-11,-4 L11,-4 L-7,10 Z", 1.0)?;
    let centers = [40, 210, 100, 210, 160, 210, 220, 210, 280, 210];
    draw.symbol(&centers, &star, Some(&thin), Some(&accent))?;

    let heart = parse_symbol("M0,4 C-8,-4 -4,-10 0,-5 C4,-10 8,-4 0,4 Z", 3.0)?;
    draw.set_translation(280.0, 130.0);
    draw.path(&heart, None, Some(&accent))?;
    draw.reset_transform();

    draw.save_png(&args[1])?;
    println!("Saved {}", args[1]);
    Ok(())
}
