//! Build script for zest-demo
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates display.toml at compile time
//! - Generates `display_config.rs` with the board constants

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();

    let config = load_config();
    validate_display(&config);
    validate_panel(&config);
    validate_touch(&config);

    generate(&config);
    println!("cargo:warning=display.toml validated successfully");
}

/// Linker scripts; memory.x comes from embassy-stm32's `memory-x` feature
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse display.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the zest-demo directory.                   ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build if any configuration errors were recorded
fn fail(title: &str, errors: &[String]) {
    if !errors.is_empty() {
        abort(title, errors);
    }
}

fn abort(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn section<'a>(config: &'a toml::Value, name: &str) -> &'a toml::Table {
    match config.get(name) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => abort("Invalid display.toml", &[format!("[{}] must be a table", name)]),
        None => abort("Invalid display.toml", &[format!("Missing [{}] section", name)]),
    }
}

/// Integer in `min..=max`, recording an error otherwise
fn int_in(
    table: &toml::Table,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            min
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            min
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            min
        }
    }
}

fn bool_of(table: &toml::Table, section: &str, key: &str, errors: &mut Vec<String>) -> bool {
    match table.get(key) {
        Some(toml::Value::Boolean(b)) => *b,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section, key));
            false
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            false
        }
    }
}

/// String restricted to `allowed`
fn choice<'a>(
    table: &'a toml::Table,
    section: &str,
    key: &str,
    allowed: &[&'a str],
    errors: &mut Vec<String>,
) -> &'a str {
    match table.get(key) {
        Some(toml::Value::String(s)) if allowed.contains(&s.as_str()) => s.as_str(),
        Some(_) => {
            errors.push(format!("[{}] {} must be one of {}", section, key, allowed.join(", ")));
            allowed[0]
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            allowed[0]
        }
    }
}

/// "#RRGGBB" to RGB565 components
fn parse_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let rgb = u32::from_str_radix(hex, 16).ok()?;
    let r = (rgb >> 16) as u8;
    let g = (rgb >> 8) as u8;
    let b = rgb as u8;
    Some((r >> 3, g >> 2, b >> 3))
}

fn background(table: &toml::Table, errors: &mut Vec<String>) -> (u8, u8, u8) {
    match table.get("background") {
        Some(toml::Value::String(s)) => parse_color(s).unwrap_or_else(|| {
            errors.push("[display] background must be \"#RRGGBB\"".to_string());
            (0, 0, 0)
        }),
        _ => {
            errors.push("[display] missing 'background' (\"#RRGGBB\")".to_string());
            (0, 0, 0)
        }
    }
}

/// Validate the [display] section
fn validate_display(config: &toml::Value) {
    let display = section(config, "display");
    let mut errors = Vec::new();

    let width = int_in(display, "display", "width", 1, 132, &mut errors);
    let height = int_in(display, "display", "height", 1, 162, &mut errors);
    let (_, visible_height) = visible_size(config, width, height);
    let _ = int_in(display, "display", "buffer_lines", 1, visible_height, &mut errors);
    let refresh = int_in(display, "display", "refresh_period_ms", 1, 1000, &mut errors);
    let tick = int_in(display, "display", "tick_period_ms", 1, 1000, &mut errors);
    if tick > refresh {
        errors.push("[display] tick_period_ms must not exceed refresh_period_ms".to_string());
    }
    let _ = background(display, &mut errors);

    fail("Invalid display configuration", &errors);
}

const ORIENTATIONS: &[&str] = &["portrait", "landscape", "portrait-flipped", "landscape-flipped"];

/// Screen size seen by the GUI: `[display]` gives the native portrait
/// size, landscape orientations exchange the axes
fn visible_size(config: &toml::Value, width: i64, height: i64) -> (i64, i64) {
    let orientation = config
        .get("panel")
        .and_then(|panel| panel.get("orientation"))
        .and_then(|value| value.as_str());
    match orientation {
        Some("landscape" | "landscape-flipped") => (height, width),
        _ => (width, height),
    }
}
const LEVELS: &[&str] = &["high", "low"];

/// Validate the [panel] section
fn validate_panel(config: &toml::Value) {
    let panel = section(config, "panel");
    let mut errors = Vec::new();

    choice(panel, "panel", "orientation", ORIENTATIONS, &mut errors);
    int_in(panel, "panel", "x_offset", 0, 32, &mut errors);
    int_in(panel, "panel", "y_offset", 0, 32, &mut errors);
    bool_of(panel, "panel", "bgr", &mut errors);
    choice(panel, "panel", "backlight", LEVELS, &mut errors);
    int_in(panel, "panel", "spi_frequency_hz", 100_000, 40_000_000, &mut errors);

    fail("Invalid panel configuration", &errors);
}

/// Validate the [touch] section
fn validate_touch(config: &toml::Value) {
    let touch = section(config, "touch");
    let mut errors = Vec::new();

    for key in ["x_min", "x_max", "y_min", "y_max", "pressure_threshold"] {
        int_in(touch, "touch", key, 0, 4095, &mut errors);
    }
    bool_of(touch, "touch", "swap_xy", &mut errors);
    int_in(touch, "touch", "read_period_ms", 1, 1000, &mut errors);
    choice(touch, "touch", "irq", LEVELS, &mut errors);
    int_in(touch, "touch", "spi_frequency_hz", 100_000, 2_500_000, &mut errors);

    fail("Invalid touch configuration", &errors);
}

fn level(s: &str) -> &'static str {
    match s {
        "low" => "ActiveLevel::Low",
        _ => "ActiveLevel::High",
    }
}

fn orientation(s: &str) -> &'static str {
    match s {
        "landscape" => "Orientation::Landscape",
        "portrait-flipped" => "Orientation::PortraitFlipped",
        "landscape-flipped" => "Orientation::LandscapeFlipped",
        _ => "Orientation::Portrait",
    }
}

/// Write OUT_DIR/display_config.rs from the validated config
fn generate(config: &toml::Value) {
    let display = section(config, "display");
    let panel = section(config, "panel");
    let touch = section(config, "touch");
    // Already validated; errors here are unreachable
    let mut e = Vec::new();

    let width = int_in(display, "display", "width", 1, 132, &mut e);
    let height = int_in(display, "display", "height", 1, 162, &mut e);
    let (screen_width, screen_height) = visible_size(config, width, height);
    let lines = int_in(display, "display", "buffer_lines", 1, screen_height, &mut e);
    let refresh = int_in(display, "display", "refresh_period_ms", 1, 1000, &mut e);
    let tick = int_in(display, "display", "tick_period_ms", 1, 1000, &mut e);
    let (r, g, b) = background(display, &mut e);

    let orient = choice(panel, "panel", "orientation", ORIENTATIONS, &mut e);
    let x_offset = int_in(panel, "panel", "x_offset", 0, 32, &mut e);
    let y_offset = int_in(panel, "panel", "y_offset", 0, 32, &mut e);
    let bgr = bool_of(panel, "panel", "bgr", &mut e);
    let backlight = choice(panel, "panel", "backlight", LEVELS, &mut e);
    let lcd_hz = int_in(panel, "panel", "spi_frequency_hz", 100_000, 40_000_000, &mut e);

    let x_min = int_in(touch, "touch", "x_min", 0, 4095, &mut e);
    let x_max = int_in(touch, "touch", "x_max", 0, 4095, &mut e);
    let y_min = int_in(touch, "touch", "y_min", 0, 4095, &mut e);
    let y_max = int_in(touch, "touch", "y_max", 0, 4095, &mut e);
    let swap_xy = bool_of(touch, "touch", "swap_xy", &mut e);
    let threshold = int_in(touch, "touch", "pressure_threshold", 0, 4095, &mut e);
    let read = int_in(touch, "touch", "read_period_ms", 1, 1000, &mut e);
    let irq = choice(touch, "touch", "irq", LEVELS, &mut e);
    let touch_hz = int_in(touch, "touch", "spi_frequency_hz", 100_000, 2_500_000, &mut e);

    let source = format!(
        "// Generated by build.rs from display.toml\n\
         \n\
         pub const DISPLAY_CONFIG: DisplayConfig = DisplayConfig {{\n\
         \x20   width: {screen_width},\n\
         \x20   height: {screen_height},\n\
         \x20   buffer_lines: {lines},\n\
         \x20   refresh_period_ms: {refresh},\n\
         \x20   tick_period_ms: {tick},\n\
         \x20   background: Rgb565::new({r}, {g}, {b}),\n\
         }};\n\
         \n\
         pub const DRAW_BUFFER_PIXELS: usize = {pixels};\n\
         \n\
         pub const PANEL_CONFIG: Ili9163cConfig = Ili9163cConfig {{\n\
         \x20   width: {width},\n\
         \x20   height: {height},\n\
         \x20   x_offset: {x_offset},\n\
         \x20   y_offset: {y_offset},\n\
         \x20   orientation: {orientation},\n\
         \x20   bgr: {bgr},\n\
         \x20   backlight: {backlight},\n\
         }};\n\
         \n\
         pub const LCD_SPI: SpiConfig = SpiConfig::with_mode({lcd_hz}, Mode::Mode0);\n\
         \n\
         pub const TOUCH_CONFIG: TouchConfig = TouchConfig {{\n\
         \x20   calibration: TouchCalibration {{\n\
         \x20       x_min: {x_min},\n\
         \x20       x_max: {x_max},\n\
         \x20       y_min: {y_min},\n\
         \x20       y_max: {y_max},\n\
         \x20       swap_xy: {swap_xy},\n\
         \x20   }},\n\
         \x20   pressure_threshold: {threshold},\n\
         \x20   read_period_ms: {read},\n\
         }};\n\
         \n\
         pub const TOUCH_IRQ: ActiveLevel = {irq};\n\
         \n\
         pub const TOUCH_SPI: SpiConfig = SpiConfig::with_mode({touch_hz}, Mode::Mode0);\n",
        pixels = screen_width * lines,
        orientation = orientation(orient),
        backlight = level(backlight),
        irq = level(irq),
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    fs::write(out_dir.join("display_config.rs"), source).expect("failed to write display_config.rs");
}
