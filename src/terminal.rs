// SPDX-License-Identifier: GPL-3.0-only

//! Terminal photo board
//!
//! Renders the board canvas scaled to the terminal. Photos and the camera
//! preview are drawn with Unicode half-block characters for improved
//! vertical resolution. The mouse drags photos around; the keyboard drives
//! the camera.

use crate::app::{Booth, ShutterOutcome};
use crate::backends::camera::CameraFrame;
use crate::board::{self, BoardEvent, Feedback, Outcome, PhotoId, Point, PointerSample, Size};
use crate::errors::AppError;
use crate::pipelines::photo::caption_text;

use chrono::Local;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbaImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use std::collections::HashMap;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const EMPTY_HINT: &str = "Press 'c' to open the camera";
const KEY_HELP: &str = "c shutter | o camera | f filter | p pin | d download | x delete | q quit";

/// Thumbnail resolution used for photos on the board
const THUMB_WIDTH: u32 = 64;
const THUMB_HEIGHT: u32 = 80;

const BOARD_BG: Color = Color::Rgb(0xf5, 0xf5, 0xf4);
const PAPER: Color = Color::Rgb(0xff, 0xff, 0xff);
const CAPTION: Color = Color::Rgb(0x6b, 0x72, 0x80);

/// Run the terminal board until the user quits
///
/// The collection is flushed on the way out, also when the board loop fails.
pub fn run(mut booth: Booth) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut booth, &runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    booth.shutdown()?;
    result
}

/// Maps between terminal cells and canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
struct CanvasMapping {
    area: Rect,
    canvas: Size,
}

impl CanvasMapping {
    fn new(area: Rect, canvas: Size) -> Self {
        Self { area, canvas }
    }

    fn scale(&self) -> (f32, f32) {
        (
            self.canvas.width / self.area.width.max(1) as f32,
            self.canvas.height / self.area.height.max(1) as f32,
        )
    }

    /// Centre of a terminal cell in canvas coordinates
    fn to_canvas(&self, column: u16, row: u16) -> Point {
        let (sx, sy) = self.scale();
        Point::new(
            (column.saturating_sub(self.area.x) as f32 + 0.5) * sx,
            (row.saturating_sub(self.area.y) as f32 + 0.5) * sy,
        )
    }

    /// Cells covered by a canvas rectangle, clipped to the area
    fn to_cells(&self, rect: board::Rect) -> Rect {
        let (sx, sy) = self.scale();
        let right = self.area.x + self.area.width;
        let bottom = self.area.y + self.area.height;

        let clamp_x = |v: f32| {
            (self.area.x as f32 + v / sx)
                .round()
                .clamp(self.area.x as f32, right as f32) as u16
        };
        let clamp_y = |v: f32| {
            (self.area.y as f32 + v / sy)
                .round()
                .clamp(self.area.y as f32, bottom as f32) as u16
        };

        let left = clamp_x(rect.left);
        let top = clamp_y(rect.top);
        let r = clamp_x(rect.right).max(left);
        let b = clamp_y(rect.bottom).max(top);
        Rect::new(left, top, r - left, b - top)
    }
}

/// Interaction state owned by the board loop
struct BoardUi {
    mapping: CanvasMapping,
    /// Last known pointer position in canvas coordinates
    cursor: Point,
    active_drag: Option<PhotoId>,
    thumbnails: HashMap<PhotoId, RgbaImage>,
    preview: Option<CameraFrame>,
    status: String,
    exports: mpsc::Receiver<Result<PathBuf, AppError>>,
    export_sender: mpsc::Sender<Result<PathBuf, AppError>>,
}

impl BoardUi {
    fn new(canvas: Size) -> Self {
        let (export_sender, exports) = mpsc::channel();
        Self {
            mapping: CanvasMapping::new(Rect::new(0, 0, 1, 1), canvas),
            cursor: Point::ORIGIN,
            active_drag: None,
            thumbnails: HashMap::new(),
            preview: None,
            status: KEY_HELP.to_string(),
            exports,
            export_sender,
        }
    }

    fn thumbnail(&mut self, booth: &Booth, id: &PhotoId) -> Option<&RgbaImage> {
        if !self.thumbnails.contains_key(id) {
            let record = booth.store().get(id)?;
            match booth.library().load_rgba(&record.image) {
                Ok(image) => {
                    let thumb = image::imageops::thumbnail(&image, THUMB_WIDTH, THUMB_HEIGHT);
                    self.thumbnails.insert(id.clone(), thumb);
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "Could not load photo thumbnail");
                    return None;
                }
            }
        }
        self.thumbnails.get(id)
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    booth: &mut Booth,
    runtime: &tokio::runtime::Runtime,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ui = BoardUi::new(booth.config().canvas);
    info!(photos = booth.store().len(), "Terminal board started");

    loop {
        let now = Instant::now();
        match booth.tick(now) {
            Some(Ok(feedback)) => ui.status = describe(&feedback),
            Some(Err(e)) => {
                error!(error = %e, "Failed to deliver photo");
                ui.status = format!("Error: {}", e);
            }
            None => {}
        }
        while let Ok(result) = ui.exports.try_recv() {
            ui.status = match result {
                Ok(path) => format!("Saved: {}", path.display()),
                Err(e) => format!("Download failed: {}", e),
            };
        }
        ui.preview = booth.camera_mut().preview_frame();

        // Drop thumbnails of photos that are gone
        ui.thumbnails.retain(|id, _| booth.store().contains(id));

        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let board_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            ui.mapping = CanvasMapping::new(board_area, booth.config().canvas);
            render_board(booth, &mut ui, board_area, f.buffer_mut(), now);

            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            let status = StatusBar {
                message: &ui.status,
                filter: booth.camera().filter().display_name(),
            };
            f.render_widget(status, status_area);
        })?;

        // Handle input with timeout for frame updates
        if !event::poll(Duration::from_millis(33))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(key, booth, &mut ui, runtime) {
                    break;
                }
            }
            Event::Mouse(mouse) => handle_mouse(mouse, booth, &mut ui),
            Event::FocusLost => {
                if let Some(id) = ui.active_drag.take() {
                    let feedback = booth.dispatch(BoardEvent::DragCancel { id });
                    ui.status = describe(&feedback);
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Returns false when the board should close
fn handle_key(
    key: KeyEvent,
    booth: &mut Booth,
    ui: &mut BoardUi,
    runtime: &tokio::runtime::Runtime,
) -> bool {
    // Ctrl+C to quit
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('c') => {
            ui.status = match booth.shutter(Instant::now()) {
                ShutterOutcome::Opened => "Camera ready".to_string(),
                ShutterOutcome::Failed(e) => e.user_message().to_string(),
                ShutterOutcome::Disabled => "Close the camera with 'o' to retry".to_string(),
                ShutterOutcome::Busy => "Printing...".to_string(),
                ShutterOutcome::Refused => "Place the last photo first".to_string(),
                ShutterOutcome::Printing => "Printing...".to_string(),
            };
        }
        KeyCode::Char('o') => {
            let open = booth.camera_mut().toggle();
            ui.status = match booth.camera().error() {
                Some(e) => e.user_message().to_string(),
                None if open => "Camera ready".to_string(),
                None => "Camera closed".to_string(),
            };
        }
        KeyCode::Char('f') => {
            let filter = booth.camera_mut().cycle_filter();
            ui.status = format!("Filter: {}", filter.display_name());
        }
        KeyCode::Char('p') => {
            if let Some(id) = booth.controller().photo_at(ui.cursor).cloned() {
                let feedback = booth.dispatch(BoardEvent::TogglePin { id });
                ui.status = describe(&feedback);
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = booth.controller().photo_at(ui.cursor).cloned() {
                if ui.active_drag.as_ref() == Some(&id) {
                    ui.active_drag = None;
                }
                let feedback = booth.dispatch(BoardEvent::Delete { id });
                ui.status = describe(&feedback);
            }
        }
        KeyCode::Char('d') => {
            if let Some(id) = booth.controller().photo_at(ui.cursor).cloned() {
                match booth.prepare_export(&id, None) {
                    Ok(job) => {
                        ui.status = format!("Downloading {}...", job.file_name());
                        let sender = ui.export_sender.clone();
                        runtime.spawn(async move {
                            let _ = sender.send(job.run().await);
                        });
                    }
                    Err(e) => ui.status = format!("Download failed: {}", e),
                }
            }
        }
        _ => {}
    }
    true
}

fn handle_mouse(mouse: MouseEvent, booth: &mut Booth, ui: &mut BoardUi) {
    let point = ui.mapping.to_canvas(mouse.column, mouse.row);
    ui.cursor = point;
    let pointer = PointerSample::from(point);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(id) = booth.controller().photo_at(point).cloned() else {
                return;
            };
            let feedback = booth.dispatch(BoardEvent::DragStart {
                id: id.clone(),
                pointer,
            });
            if feedback.outcome == Outcome::DragStarted {
                ui.active_drag = Some(id);
            } else {
                ui.status = "Pinned photos stay put".to_string();
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(id) = ui.active_drag.clone() {
                booth.dispatch(BoardEvent::DragMove { id, pointer });
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(id) = ui.active_drag.take() {
                let feedback = booth.dispatch(BoardEvent::DragEnd { id, pointer });
                ui.status = describe(&feedback);
            }
        }
        _ => {}
    }
}

/// Status line for the result of a board event
fn describe(feedback: &Feedback) -> String {
    match &feedback.outcome {
        Outcome::Added(_) => "Photo printed, drag it onto the board".to_string(),
        Outcome::Rejected(e) => format!("Photo rejected: {}", e),
        Outcome::Placed { .. } => "Photo placed".to_string(),
        Outcome::Trashed(_) => "Photo thrown away".to_string(),
        Outcome::Deleted(_) => "Photo deleted".to_string(),
        Outcome::PinToggled { pinned: true } => "Photo pinned".to_string(),
        Outcome::PinToggled { pinned: false } => "Photo unpinned".to_string(),
        Outcome::Ignored | Outcome::DragStarted | Outcome::Dragging { .. } => KEY_HELP.to_string(),
    }
}

fn render_board(booth: &Booth, ui: &mut BoardUi, area: Rect, buf: &mut Buffer, now: Instant) {
    fill(buf, area, BOARD_BG);
    let mapping = ui.mapping;
    let photo_size = booth.controller().layout().photo_size;

    // Trash
    let trash = mapping.to_cells(booth.controller().trash_bounds());
    let trash_color = if booth.hovering_trash() {
        Color::Rgb(0xef, 0x44, 0x44)
    } else {
        Color::Rgb(0xa8, 0xa2, 0x9e)
    };
    fill(buf, trash, trash_color);
    put_centered(buf, trash, trash.y + trash.height / 2, "TRASH", Color::White, trash_color);

    // Camera in the bottom-left corner
    let camera = board::Rect::new(
        0.0,
        (booth.config().canvas.height - photo_size.height).max(0.0),
        photo_size.width,
        booth.config().canvas.height,
    );
    render_camera(booth, ui, mapping.to_cells(camera), buf, now);

    if booth.store().is_empty() {
        put_centered(buf, area, area.y + area.height / 2, EMPTY_HINT, CAPTION, BOARD_BG);
    }

    // Photos in insertion order so later photos sit on top
    let ids: Vec<PhotoId> = booth.store().photos().iter().map(|p| p.id.clone()).collect();
    for id in ids {
        let Some(origin) = booth.controller().visual_position(&id) else {
            continue;
        };
        let cells = mapping.to_cells(board::Rect::from_origin_size(origin, photo_size));
        if cells.width < 3 || cells.height < 3 {
            continue;
        }
        fill(buf, cells, PAPER);

        let Some(record) = booth.store().get(&id) else {
            continue;
        };
        let caption = caption_text(&record.captured_at.with_timezone(&Local));
        let label = if record.pinned {
            format!("* {}", caption)
        } else if !record.placed {
            format!("new {}", caption)
        } else {
            caption
        };
        let caption_row = cells.y + cells.height - 1;

        if let Some(thumb) = ui.thumbnail(booth, &id) {
            let inner = Rect::new(cells.x + 1, cells.y + 1, cells.width - 2, cells.height - 3);
            ImageWidget::new(thumb).render(inner, buf);
        }
        put_centered(buf, cells, caption_row, &label, CAPTION, PAPER);
    }
}

fn render_camera(booth: &Booth, ui: &BoardUi, cells: Rect, buf: &mut Buffer, now: Instant) {
    if cells.width < 3 || cells.height < 3 {
        return;
    }
    let body = Color::Rgb(0x29, 0x25, 0x24);
    fill(buf, cells, body);

    let camera = booth.camera();
    let lens = Rect::new(cells.x + 1, cells.y + 1, cells.width - 2, cells.height - 3);
    let label_row = cells.y + cells.height - 1;

    if !camera.is_open() {
        put_centered(buf, cells, lens.y + lens.height / 2, "camera off", Color::Gray, body);
    } else if let Some(e) = camera.error() {
        put_centered(buf, cells, lens.y + lens.height / 2, e.user_message(), Color::LightRed, body);
    } else if let Some(frame) = &ui.preview {
        FrameWidget { frame }.render(lens, buf);
    }

    let label = match camera.print_progress(now) {
        Some(progress) => format!("printing {:>3}%", (progress * 100.0) as u32),
        None => format!("{} | {}", camera.source_name(), camera.filter().display_name()),
    };
    put_centered(buf, cells, label_row, &label, Color::White, body);
}

fn fill(buf: &mut Buffer, area: Rect, color: Color) {
    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(' ');
                cell.set_bg(color);
            }
        }
    }
}

fn put_centered(buf: &mut Buffer, area: Rect, row: u16, text: &str, fg: Color, bg: Color) {
    if area.width == 0 || row < area.y || row >= area.y + area.height {
        return;
    }
    let text: String = text.chars().take(area.width as usize).collect();
    let width = text.chars().count() as u16;
    let x = area.x + (area.width - width) / 2;
    buf.set_string(x, row, text, Style::default().fg(fg).bg(bg));
}

/// Widget that renders an RGBA image using half-block characters
struct ImageWidget<'a> {
    image: &'a RgbaImage,
}

impl<'a> ImageWidget<'a> {
    fn new(image: &'a RgbaImage) -> Self {
        Self { image }
    }
}

impl Widget for ImageWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (width, height) = self.image.dimensions();
        render_half_blocks(width, height, area, buf, |x, y| {
            let p = self.image.get_pixel(x, y);
            (p[0], p[1], p[2])
        });
    }
}

/// Widget that renders a live camera frame using half-block characters
struct FrameWidget<'a> {
    frame: &'a CameraFrame,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = self.frame;
        render_half_blocks(frame.width, frame.height, area, buf, |x, y| {
            sample_pixel_rgb(frame, x, y)
        });
    }
}

/// Fit a `width` x `height` picture into `area`, keeping its aspect ratio
///
/// Each terminal cell displays 2 vertical pixels: the upper half (▀) is
/// coloured with fg, the lower half with bg.
fn render_half_blocks(
    width: u32,
    height: u32,
    area: Rect,
    buf: &mut Buffer,
    sample: impl Fn(u32, u32) -> (u8, u8, u8),
) {
    if width == 0 || height == 0 || area.width == 0 || area.height == 0 {
        return;
    }

    let aspect = width as f64 / height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height * 2) as f64;

    let (display_width, display_height) = if term_width / term_height > aspect {
        // Area is wider - fit to height
        let h = term_height;
        ((h * aspect) as u16, (h / 2.0) as u16)
    } else {
        // Area is taller - fit to width
        let w = term_width;
        (w as u16, (w / aspect / 2.0) as u16)
    };
    if display_width == 0 || display_height == 0 {
        return;
    }

    // Center the image
    let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
    let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

    let x_scale = width as f64 / display_width as f64;
    let y_scale = height as f64 / (display_height * 2) as f64;

    for ty in 0..display_height {
        for tx in 0..display_width {
            let term_x = x_offset + tx;
            let term_y = y_offset + ty;
            if term_x >= area.x + area.width || term_y >= area.y + area.height {
                continue;
            }

            let src_x = ((tx as f64 * x_scale) as u32).min(width - 1);
            let src_y_top = ((ty as f64 * 2.0 * y_scale) as u32).min(height - 1);
            let src_y_bottom = (((ty as f64 * 2.0 + 1.0) * y_scale) as u32).min(height - 1);

            let (tr, tg, tb) = sample(src_x, src_y_top);
            let (br, bg, bb) = sample(src_x, src_y_bottom);

            if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                cell.set_char('▀');
                cell.set_fg(Color::Rgb(tr, tg, tb));
                cell.set_bg(Color::Rgb(br, bg, bb));
            }
        }
    }
}

fn sample_pixel_rgb(frame: &CameraFrame, x: u32, y: u32) -> (u8, u8, u8) {
    let x = x.min(frame.width.saturating_sub(1));
    let y = y.min(frame.height.saturating_sub(1));
    let idx = (y * frame.stride + x * 4) as usize;
    if idx + 2 < frame.data.len() {
        (frame.data[idx], frame.data[idx + 1], frame.data[idx + 2])
    } else {
        (0, 0, 0)
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
    filter: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let line = format!("[{}] {}", self.filter, self.message);
        let text: String = line.chars().take(area.width as usize).collect();

        buf.set_string(
            area.x,
            area.y,
            text,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> CanvasMapping {
        CanvasMapping::new(Rect::new(0, 0, 128, 40), Size::new(1280.0, 800.0))
    }

    #[test]
    fn test_cell_centres_map_to_canvas() {
        let m = mapping();
        assert_eq!(m.to_canvas(0, 0), Point::new(5.0, 10.0));
        assert_eq!(m.to_canvas(127, 39), Point::new(1275.0, 790.0));
    }

    #[test]
    fn test_canvas_rect_maps_to_cells() {
        let m = mapping();
        let cells = m.to_cells(board::Rect::new(1160.0, 664.0, 1240.0, 760.0));
        assert_eq!(cells, Rect::new(116, 33, 8, 5));
    }

    #[test]
    fn test_offscreen_rect_is_clipped() {
        let m = mapping();
        let cells = m.to_cells(board::Rect::new(1200.0, 700.0, 1600.0, 1000.0));
        assert_eq!(cells.x + cells.width, 128);
        assert_eq!(cells.y + cells.height, 40);
    }

    #[test]
    fn test_status_bar_truncates() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            message: "a very long message",
            filter: "BW",
        }
        .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "[");
        assert_eq!(buf[(9, 0)].symbol(), "r");
    }
}
