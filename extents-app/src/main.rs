use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use extents_config::{AppConfig, ConfigError, ReportFormat};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

mod demo;
mod errors;
mod report;

use errors::AppError;
use report::ExtentsReport;

/// 计算演示图纸中各实体及整张图纸的范围。
#[derive(Debug, Parser)]
#[command(name = "extents", version)]
struct Cli {
    /// 配置文件路径；缺省时按 `EXTENTS_CONFIG` 或 `./config/default.toml` 查找。
    #[arg(long)]
    config: Option<PathBuf>,
    /// 报告输出格式，覆盖配置中的 `report.format`。
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// 块参照最大嵌套层数，覆盖配置中的 `extents.max_block_depth`。
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let mut config = load_configuration(cli.config);
    init_logging(&config);
    if let Some(format) = cli.format {
        config.report.format = format.into();
    }
    if let Some(depth) = cli.max_depth {
        config.extents.max_block_depth = depth;
    }
    info!(
        format = ?config.report.format,
        max_block_depth = config.extents.max_block_depth,
        "启动范围计算演示"
    );

    match run(&config) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            error!(error = %err, "范围计算演示失败");
            std::process::exit(1);
        }
    }
}

fn run(config: &AppConfig) -> Result<String, AppError> {
    let document = demo::build_demo_document();
    let report = ExtentsReport::build(&document, config.extents.max_block_depth)?;
    report.render(config.report.format, config.report.precision)
}

fn load_configuration(override_path: Option<PathBuf>) -> AppConfig {
    match override_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "加载指定配置失败，使用默认配置");
            AppConfig::default()
        }),
        None => match AppConfig::discover() {
            Ok(cfg) => cfg,
            Err(err) => {
                match &err {
                    ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
                        warn!(path = %path.display(), error = %err, "加载默认配置失败，使用内建默认值");
                    }
                    ConfigError::Context { .. } => {
                        warn!(error = %err, "加载默认配置失败，使用内建默认值");
                    }
                }
                AppConfig::default()
            }
        },
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_writer(std::io::stderr).with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
