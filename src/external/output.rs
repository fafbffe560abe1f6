use crate::consts;
use crate::core::display::{self, Frame};
use crate::core::error::{Chip8Error, Result};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

const BACKGROUND: Color = Color {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};
const FOREGROUND: Color = Color {
    r: 0,
    g: 255,
    b: 0,
    a: 255,
};

pub struct DisplayDriver {
    pub screen: Canvas<Window>,
    scale: u32,
    title: String,
}

impl DisplayDriver {
    pub fn new(context: &sdl2::Sdl, scale: u32) -> Result<Self> {
        let video_subsystem = context.video().map_err(Chip8Error::Sdl)?;
        let window = video_subsystem
            .window(
                "CHIP-8",
                consts::CHIP8_WIDTH as u32 * scale,
                consts::CHIP8_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()
            .map_err(|e| Chip8Error::Sdl(e.to_string()))?;
        let mut canvas: Canvas<Window> = window
            .into_canvas()
            .present_vsync()
            .build()
            .map_err(|e| Chip8Error::Sdl(e.to_string()))?;

        canvas.set_draw_color(BACKGROUND);
        canvas.clear();
        canvas.present();

        Ok(DisplayDriver {
            screen: canvas,
            scale,
            title: String::from("CHIP-8"),
        })
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        if self.title != title {
            self.screen
                .window_mut()
                .set_title(title)
                .map_err(|e| Chip8Error::Sdl(e.to_string()))?;
            self.title = title.to_owned();
        }
        Ok(())
    }

    pub fn blank(&mut self) {
        self.screen.set_draw_color(BACKGROUND);
        self.screen.clear();
        self.screen.present();
    }

    pub fn draw(&mut self, frame: &Frame) -> Result<()> {
        let rects: Vec<Rect> = (0..consts::CHIP8_HEIGHT)
            .flat_map(|y| (0..consts::CHIP8_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| display::pixel(frame, x, y))
            .map(|(x, y)| {
                Rect::new(
                    (x as u32 * self.scale) as i32,
                    (y as u32 * self.scale) as i32,
                    self.scale,
                    self.scale,
                )
            })
            .collect();

        self.screen.set_draw_color(BACKGROUND);
        self.screen.clear();
        self.screen.set_draw_color(FOREGROUND);
        self.screen.fill_rects(&rects).map_err(Chip8Error::Sdl)?;
        self.screen.present();
        Ok(())
    }
}
