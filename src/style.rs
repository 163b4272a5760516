//! Terminal styling for CLI output.
//!
//! Respects `NO_COLOR` and falls back to plain text when stdout is not a
//! color-capable terminal.

use std::{
   io::{self, BufRead, Write},
   sync::{OnceLock, mpsc},
   thread,
   time::Duration,
};

use owo_colors::{OwoColorize, Style};

static COLOR_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if colors should be used (cached on first call).
pub fn colors_enabled() -> bool {
   *COLOR_ENABLED.get_or_init(|| {
      // https://no-color.org/
      if std::env::var("NO_COLOR").is_ok() {
         return false;
      }
      supports_color::on(supports_color::Stream::Stdout).is_some_and(|level| level.has_basic)
   })
}

fn paint(s: &str, style: Style) -> String {
   if colors_enabled() { s.style(style).to_string() } else { s.to_string() }
}

/// Checkmarks and completed actions (green + bold).
pub fn success(s: &str) -> String {
   paint(s, Style::new().green().bold())
}

/// Non-fatal issues (yellow).
pub fn warning(s: &str) -> String {
   paint(s, Style::new().yellow())
}

/// Failures (red + bold).
pub fn error(s: &str) -> String {
   paint(s, Style::new().red().bold())
}

pub fn dim(s: &str) -> String {
   paint(s, Style::new().dimmed())
}

pub fn bold(s: &str) -> String {
   paint(s, Style::new().bold())
}

/// High severity review findings (red + bold).
pub fn severity_high(s: &str) -> String {
   paint(s, Style::new().red().bold())
}

/// Medium severity review findings (yellow + bold).
pub fn severity_medium(s: &str) -> String {
   paint(s, Style::new().yellow().bold())
}

/// Low severity review findings (cyan).
pub fn severity_low(s: &str) -> String {
   paint(s, Style::new().cyan())
}

/// Print a warning to stderr.
pub fn warn(msg: &str) {
   eprintln!("{} {}", warning(icons::WARNING), warning(msg));
}

/// Print `prompt` and read one trimmed answer line from `input`.
pub fn prompt_line(input: &mut impl BufRead, prompt: &str) -> io::Result<String> {
   print!("{prompt}");
   io::stdout().flush()?;
   let mut line = String::new();
   input.read_line(&mut line)?;
   Ok(line.trim().to_string())
}

/// Terminal width, capped at 80 columns for headers.
pub fn term_width() -> usize {
   terminal_size::terminal_size()
      .map_or(80, |(w, _)| w.0 as usize)
      .min(80)
}

const HORIZONTAL: char = '\u{2500}';

pub fn separator(width: usize) -> String {
   dim(&HORIZONTAL.to_string().repeat(width))
}

/// Section header with decorative lines on both sides.
pub fn section_header(title: &str, width: usize) -> String {
   let line_len = width.saturating_sub(title.chars().count() + 2) / 2;
   let line = HORIZONTAL.to_string().repeat(line_len);
   format!("{} {} {}", dim(&line), bold(title), dim(&line))
}

pub mod icons {
   pub const SUCCESS: &str = "\u{2713}";
   pub const WARNING: &str = "\u{26A0}";
   pub const ERROR: &str = "\u{2717}";
   pub const BULLET: &str = "\u{2022}";
}

const SPINNER_FRAMES: &[char] = &[
   '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
   '\u{2807}', '\u{280F}',
];

/// Run a function with a spinner, finishing with a success or failure icon.
/// Prints the message once and runs `f` directly when colors are disabled.
pub fn with_spinner_result<F, T, E>(message: &str, f: F) -> Result<T, E>
where
   F: FnOnce() -> Result<T, E>,
{
   if !colors_enabled() {
      println!("{message}");
      return f();
   }

   let (tx, rx) = mpsc::channel::<bool>();
   let msg = message.to_string();

   let spinner = thread::spawn(move || {
      let mut idx = 0;
      loop {
         match rx.try_recv() {
            Ok(ok) => {
               let icon = if ok { success(icons::SUCCESS) } else { error(icons::ERROR) };
               print!("\r\x1b[K{icon} {msg}\n");
               io::stdout().flush().ok();
               break;
            },
            Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {},
         }
         print!("\r{} {}", SPINNER_FRAMES[idx].cyan(), msg);
         io::stdout().flush().ok();
         idx = (idx + 1) % SPINNER_FRAMES.len();
         thread::sleep(Duration::from_millis(80));
      }
   });

   let result = f();
   tx.send(result.is_ok()).ok();
   spinner.join().ok();
   result
}
