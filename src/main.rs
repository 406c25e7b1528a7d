//! Demo host: presents the engine in a resizable window.
//!
//! The host stays on its side of the boundary: it forwards normalized
//! commands (pointer, resize, add-source, stop) and presents the frame
//! buffer. Input is sampled once per frame, so bursts of pointer movement
//! coalesce to latest-wins exactly as the engine expects.
//!
//! Controls: drag a blob with the left mouse button, `A` adds a source at
//! the cursor, `S` saves a PNG snapshot, `Esc` quits.

use std::error::Error;

use metafield::prelude::*;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

const INITIAL_WIDTH: usize = 960;
const INITIAL_HEIGHT: usize = 600;

fn main() -> Result<(), Box<dyn Error>> {
    let mut window = Window::new(
        "metafield",
        INITIAL_WIDTH,
        INITIAL_HEIGHT,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| e.to_string())?;
    window.set_target_fps(60);

    let mut engine = Engine::new(
        EngineConfig::new(INITIAL_WIDTH as u32, INITIAL_HEIGHT as u32).with_resolution_scale(0.75),
    )?;

    let mut shown: Vec<u32> = vec![0; INITIAL_WIDTH * INITIAL_HEIGHT];
    let mut last_size = (INITIAL_WIDTH, INITIAL_HEIGHT);
    let mut snapshots = 0u32;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        // Window size changes become coalesced resize requests.
        let size = window.get_size();
        if size != last_size && size.0 > 0 && size.1 > 0 {
            engine.apply(Command::Resize {
                width: size.0 as u32,
                height: size.1 as u32,
            })?;
            last_size = size;
        }

        // Latest pointer state, once per frame.
        if let Some((x, y)) = window.get_mouse_pos(MouseMode::Clamp) {
            engine.apply(Command::PointerUpdate {
                x: x as f64,
                y: y as f64,
                down: window.get_mouse_down(MouseButton::Left),
            })?;
        }

        if window.is_key_pressed(Key::A, KeyRepeat::No) {
            if let Some((x, y)) = window.get_mouse_pos(MouseMode::Clamp) {
                let hue = (engine.sources().len() as f64 * 47.0) % 360.0;
                engine.apply(Command::AddSource {
                    x: x as f64,
                    y: y as f64,
                    radius: 120.0,
                    color: Hsva::new(hue, 100.0, 100.0, 1.0),
                })?;
            }
        }

        engine.tick();
        let frame = engine.frame();

        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            let path = format!("metafield-{snapshots:03}.png");
            image::save_buffer(
                &path,
                frame.data(),
                frame.width() as u32,
                frame.height() as u32,
                image::ExtendedColorType::Rgba8,
            )?;
            snapshots += 1;
            println!("saved {path}");
        }

        // minifb wants 0RGB u32 pixels.
        shown.resize(frame.width() * frame.height(), 0);
        let pixels: &[[u8; 4]] = bytemuck::cast_slice(frame.data());
        for (out, px) in shown.iter_mut().zip(pixels) {
            *out = u32::from(px[0]) << 16 | u32::from(px[1]) << 8 | u32::from(px[2]);
        }
        window
            .update_with_buffer(&shown, frame.width(), frame.height())
            .map_err(|e| e.to_string())?;
    }

    engine.apply(Command::Stop)?;
    Ok(())
}
