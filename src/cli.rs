use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "loss-audit")]
#[command(about = "亏损项目分析工具：多规则筛查异常项目并汇总输出", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 输出详细日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 设置文件（默认 ~/.config/loss-audit/config.json）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 分析一个Excel文件
    Analyze {
        /// 输入Excel文件
        #[arg(required = true)]
        input: PathBuf,

        /// 输出文件/目录（默认：输入文件所在目录）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 输出格式 (json/excel/both)，省略时使用设置值
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 工作表名称（默认第一个工作表）
        #[arg(long)]
        sheet: Option<String>,

        /// 项目类别配置文件（JSON）
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// 批量分析文件夹内的Excel文件
    Batch {
        /// 文件夹路径
        #[arg(required = true)]
        folder: PathBuf,

        /// 输出目录（默认：各输入文件所在目录）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 输出格式 (json/excel/both)，省略时使用设置值
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 递归扫描子文件夹
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 项目类别配置文件（JSON）
        #[arg(long)]
        categories: Option<PathBuf>,
    },

    /// 显示解析出的列名及逻辑列的定位结果
    Columns {
        /// 输入Excel文件
        #[arg(required = true)]
        input: PathBuf,

        /// 工作表名称
        #[arg(long)]
        sheet: Option<String>,
    },

    /// 显示/初始化设置
    Config {
        /// 显示设置
        #[arg(long)]
        show: bool,

        /// 写出默认设置文件
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Excel,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
