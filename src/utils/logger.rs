// utils/logger.rs
//
// env_logger 控制台输出 + 追加写日志文件，级别 / 目录 / 轮转参数来自 `LogConfig`
use crate::config::LogConfig;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, Once, OnceLock};

const BYTES_PER_MB: u64 = 1024 * 1024;

static INIT_LOGGER: Once = Once::new();
static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

/// 级别名不区分大小写；无法识别时回退到 INFO
fn level_filter(level: &str) -> LevelFilter {
    LevelFilter::from_str(level.trim()).unwrap_or_else(|_| {
        eprintln!("⚠️ 无效日志级别「{}」，使用默认 INFO", level);
        LevelFilter::Info
    })
}

/// 文件里的一行日志（无颜色）
fn render_line(timestamp: &str, level: Level, target: &str, args: fmt::Arguments<'_>) -> String {
    format!("[{}] [{:<5}] [{}] - {}", timestamp, level, target, args)
}

/// 全局只初始化一次；日志文件打不开时只输出到控制台
pub fn init_logger(cfg: &LogConfig) {
    INIT_LOGGER.call_once(|| {
        let level = level_filter(&cfg.level);

        let file_path = match open_log_file(cfg) {
            Ok((path, file)) => {
                let _ = LOG_FILE.set(Mutex::new(file));
                Some(path)
            }
            Err(e) => {
                eprintln!("❌ 日志文件不可用（{}）: {}", cfg.dir, e);
                None
            }
        };

        let mut builder = Builder::new();
        builder
            .filter_level(level)
            .filter_module("ethers_providers", LevelFilter::Warn)
            // RUST_LOG 可以覆盖上面的过滤规则
            .parse_default_env()
            .format(|buf, record| {
                let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

                if let Some(file) = LOG_FILE.get() {
                    if let Ok(mut file) = file.lock() {
                        let line = render_line(&now, record.level(), record.target(), *record.args());
                        let _ = writeln!(file, "{}", line);
                    }
                }

                let style = buf.default_level_style(record.level());
                writeln!(
                    buf,
                    "[{}] [{style}{:<5}{style:#}] [{}] - {}",
                    now,
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .target(Target::Stdout);

        if let Err(e) = builder.try_init() {
            eprintln!("❌ 日志初始化失败: {}", e);
            return;
        }

        match file_path {
            Some(path) => log::info!("✅ 日志初始化完成 | 级别: {} | 文件: {}", level, path.display()),
            None => log::info!("✅ 日志初始化完成 | 级别: {} | 仅控制台", level),
        }
    });
}

fn open_log_file(cfg: &LogConfig) -> io::Result<(PathBuf, File)> {
    let dir = Path::new(&cfg.dir);
    fs::create_dir_all(dir)?;

    if let Err(e) = rotate_logs(dir, &cfg.file, cfg.max_size_mb * BYTES_PER_MB, cfg.max_files) {
        eprintln!("⚠️ 日志轮转失败: {}", e);
    }

    let path = dir.join(&cfg.file);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// 当前文件达到 `max_bytes` 时依次后移：file → file.1 → ... → file.{keep}，
/// 最老的一份被覆盖。返回是否发生了轮转。
fn rotate_logs(dir: &Path, file_name: &str, max_bytes: u64, keep: usize) -> io::Result<bool> {
    if max_bytes == 0 || keep == 0 {
        return Ok(false);
    }

    let current = dir.join(file_name);
    let size = match fs::metadata(&current) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size < max_bytes {
        return Ok(false);
    }

    let numbered = |i: usize| dir.join(format!("{}.{}", file_name, i));
    for i in (1..keep).rev() {
        let src = numbered(i);
        if src.exists() {
            fs::rename(&src, numbered(i + 1))?;
        }
    }
    fs::rename(&current, numbered(1))?;
    Ok(true)
}

// ==================== 便捷日志宏 ====================
#[macro_export]
macro_rules! log_trace { ($($arg:tt)*) => { log::trace!($($arg)*) }; }
#[macro_export]
macro_rules! log_debug { ($($arg:tt)*) => { log::debug!($($arg)*) }; }
#[macro_export]
macro_rules! log_info  { ($($arg:tt)*) => { log::info!($($arg)*) }; }
#[macro_export]
macro_rules! log_warn  { ($($arg:tt)*) => { log::warn!($($arg)*) }; }
#[macro_export]
macro_rules! log_error { ($($arg:tt)*) => { log::error!($($arg)*) }; }

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dcc-log-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter("WARN"), LevelFilter::Warn);
        assert_eq!(level_filter(" Trace "), LevelFilter::Trace);
        assert_eq!(level_filter("verbose"), LevelFilter::Info);
    }

    #[test]
    fn file_line_layout() {
        let line = render_line("2024-01-01 00:00:00.000", Level::Warn, "dual_chain_client", format_args!("gas {}", 7));
        assert_eq!(line, "[2024-01-01 00:00:00.000] [WARN ] [dual_chain_client] - gas 7");
    }

    #[test]
    fn small_or_missing_files_are_not_rotated() {
        let dir = temp_dir("small");
        fs::write(dir.join("app.log"), b"hello").unwrap();

        assert!(!rotate_logs(&dir, "app.log", 1024, 3).unwrap());
        assert!(!rotate_logs(&dir, "missing.log", 1, 3).unwrap());
        // 0 表示关闭轮转
        assert!(!rotate_logs(&dir, "app.log", 0, 3).unwrap());
        assert!(dir.join("app.log").exists());
        assert!(!dir.join("app.log.1").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn full_file_shifts_history_and_drops_oldest() {
        let dir = temp_dir("shift");
        fs::write(dir.join("app.log"), b"third").unwrap();
        fs::write(dir.join("app.log.1"), b"second").unwrap();
        fs::write(dir.join("app.log.2"), b"first").unwrap();

        assert!(rotate_logs(&dir, "app.log", 4, 2).unwrap());

        assert!(!dir.join("app.log").exists());
        assert_eq!(fs::read(dir.join("app.log.1")).unwrap(), b"third");
        assert_eq!(fs::read(dir.join("app.log.2")).unwrap(), b"second");
        assert!(!dir.join("app.log.3").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn log_file_is_opened_in_append_mode() {
        let dir = temp_dir("append");
        let cfg = LogConfig {
            dir: dir.to_string_lossy().into_owned(),
            file: "app.log".into(),
            ..LogConfig::default()
        };
        fs::write(dir.join("app.log"), b"before\n").unwrap();

        let (path, mut file) = open_log_file(&cfg).unwrap();
        writeln!(file, "after").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(path).unwrap(), "before\nafter\n");
        let _ = fs::remove_dir_all(&dir);
    }
}
