use std::time::Duration;

use eframe::{egui, Frame};
use egui::text::LayoutJob;
use egui::{Color32, Context, FontId, TextFormat};

use reqwest::blocking::Client;
use reqwest::Result;

/// Characters revealed per second by default.
const DEFAULT_SPEED: f32 = 64.0;

const FONT_SIZE: f32 = 16.0;

/// Rough monospace glyph metrics, relative to the font size.
const GLYPH_WIDTH: f32 = 0.6;
const ROW_HEIGHT: f32 = 1.35;

/// Reveals a text one character at a time.
///
/// A space is revealed together with the character before it, so the
/// cadence only counts visible characters.
#[derive(Debug, Default)]
struct Typewriter {
    glyphs: Vec<String>,
    revealed: usize,
    /// Pending progress, in characters.
    timer: f32,
}

impl Typewriter {
    /// Replaces the text and restarts the reveal.
    fn set_text(&mut self, text: &str) {
        self.glyphs.clear();
        self.revealed = 0;
        self.timer = 0.0;

        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let mut glyph = c.to_string();
            if let Some(' ') = chars.peek() {
                glyph.push(' ');
                chars.next();
            }
            self.glyphs.push(glyph);
        }
    }

    /// Advances the reveal by `dt` seconds at `speed` characters per second.
    ///
    /// Returns `true` while there is still something to reveal.
    fn step(&mut self, dt: f32, speed: f32) -> bool {
        if self.is_done() {
            return false;
        }

        self.timer += dt * speed;
        while self.timer >= 1.0 {
            self.timer -= 1.0;
            self.revealed += 1;
            if self.is_done() {
                return false;
            }
        }
        true
    }

    fn is_done(&self) -> bool {
        self.revealed >= self.glyphs.len()
    }

    fn visible(&self) -> String {
        self.glyphs[..self.revealed].concat()
    }

    fn hidden(&self) -> String {
        self.glyphs[self.revealed..].concat()
    }

    /// Whole text, the hidden part transparent so the layout never reflows.
    fn layout(&self, color: Color32, max_width: f32) -> LayoutJob {
        let font_id = FontId::monospace(FONT_SIZE);
        let mut job = LayoutJob::default();
        job.wrap.max_width = max_width;
        job.append(&self.visible(), 0.0, TextFormat { font_id: font_id.clone(), color, ..Default::default() });
        job.append(&self.hidden(), 0.0, TextFormat { font_id, color: Color32::TRANSPARENT, ..Default::default() });
        job
    }
}

/// Number of characters that fit in an area of the given size.
fn capacity(width: f32, height: f32) -> usize {
    let per_line = (width / (FONT_SIZE * GLYPH_WIDTH)).floor().max(0.0);
    let lines = (height / (FONT_SIZE * ROW_HEIGHT)).floor().max(0.0);
    (per_line * lines) as usize
}

/// Share of the requested length the capacity may drift by before a
/// resize asks for a new block.
const RESIZE_TOLERANCE: f32 = 0.15;

/// Whether an area of `capacity` characters is far enough from the
/// `requested` length to warrant a new block.
fn needs_resize(requested: usize, capacity: usize) -> bool {
    let drift = requested.abs_diff(capacity) as f32;
    drift > requested as f32 * RESIZE_TOLERANCE
}

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request to `/v1/text_block` for at most `length` characters.
    fn get_text_block(&self, length: usize) -> Result<String> {
        let response = self.client
            .get("http://127.0.0.1:5000/v1/text_block")
            .query(&[("length", length.to_string())])
            .send()?
            .error_for_status()?;

        response.text()
    }
}

/// Global UI state (MUST persist between frames in egui).
struct BabbleUI {
    rest: RESTContext,
    typewriter: Typewriter,
    speed: f32,
    /// Length asked on the last request.
    requested: usize,
    /// Fetch a block on the next frame (first frame, or after a click).
    refresh: bool,
}

impl BabbleUI {
    fn new() -> Result<Self> {
        Ok(Self {
            rest: RESTContext::new()?,
            typewriter: Typewriter::default(),
            speed: DEFAULT_SPEED,
            requested: 0,
            refresh: true,
        })
    }

    /// Fetches a block sized for the text area and restarts the reveal.
    fn get_text_block(&mut self, length: usize) {
        self.requested = length;
        match self.rest.get_text_block(length) {
            Ok(text) => self.typewriter.set_text(&text),
            Err(e) => {
                log::error!("Text block request failed: {e}");
                self.typewriter.set_text(&format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for BabbleUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Generate").clicked() {
                    self.refresh = true;
                }
                ui.label("Characters per second");
                ui.add(egui::DragValue::new(&mut self.speed).range(1.0..=1000.0).speed(1.0));
                ui.label(format!("{} characters requested", self.requested));
            });
            ui.separator();

            // Refetch on demand, or once the window has been resized enough
            let area = ui.available_size();
            let fits = capacity(area.x, area.y);
            let resizing = ctx.input(|i| i.pointer.any_down());
            if self.refresh || (!resizing && needs_resize(self.requested, fits)) {
                self.refresh = false;
                self.get_text_block(fits);
            }

            let color = ui.visuals().text_color();
            ui.label(self.typewriter.layout(color, area.x));
        });

        if self.typewriter.step(ctx.input(|i| i.stable_dt), self.speed) {
            ctx.request_repaint();
        }
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 420.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "rs-babble",
        options,
        Box::new(|_| Ok(Box::new(BabbleUI::new()?))),
    )
}
