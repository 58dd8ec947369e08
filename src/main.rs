use anyhow::Context;
use clap::Parser;
use dialoguer::Confirm;
use loss_audit::{batch, cli, config, export, ingest, logging};
use loss_audit_common::columns::LOGICAL_COLUMNS;
use loss_audit_common::resolver::resolve_in;
use loss_audit_common::AuditSession;
use cli::{Cli, Commands};
use config::Config;
use std::path::{Path, PathBuf};

fn load_config(path: Option<&Path>, categories: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::load(path).context("设置读取失败")?;
    match categories {
        Some(file) => config
            .with_categories(file)
            .with_context(|| format!("类别配置读取失败: {}", file.display())),
        None => Ok(config),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Analyze { input, output, format, sheet, categories } => {
            println!("📊 loss-audit - 亏损项目分析\n");
            let config = load_config(cli.config.as_deref(), categories.as_deref())?;
            let format = format.unwrap_or_else(|| config.format.clone());

            // 1. 读取
            println!("[1/3] 读取Excel...");
            let table = ingest::load_table(&input, sheet.as_deref(), &config.source_layout())
                .with_context(|| format!("读取失败: {}", input.display()))?;
            println!("✔ {} 列，{} 行\n", table.columns().len(), table.len());

            // 2. 分析
            println!("[2/3] 执行分析...");
            let mut session = AuditSession::new(&config.audit);
            session.upload(table);
            let report = session.run()?;
            for result in &report.results {
                if result.is_success() {
                    println!("✔ {}：{} 条", result.sheet_name, result.data.len());
                } else {
                    println!("✘ {}：{}", result.sheet_name, result.message.as_deref().unwrap_or(""));
                }
            }
            let classification = &report.classification;
            println!(
                "\n异常项目 {} 个（1项 {} / 2项 {} / 3项以上 {}）\n",
                classification.all.len(),
                classification.one_exception.len(),
                classification.two_exceptions.len(),
                classification.more_than_two_exceptions.len()
            );

            // 3. 输出
            println!("[3/3] 输出报告...");
            let stem = batch::default_stem(&input);
            let output_dir = output
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| input.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".")));
            let written = export::export_report(&report, &format, &output_dir, &stem)?;
            for path in written {
                println!("✔ 已输出: {}", path.display());
            }

            println!("\n✅ 分析完成");
        }

        Commands::Batch { folder, output, format, recursive, categories } => {
            println!("📊 loss-audit - 批量分析\n");
            let config = load_config(cli.config.as_deref(), categories.as_deref())?;
            let format = format.unwrap_or_else(|| config.format.clone());

            let files = batch::scan_folder(&folder, recursive)?;
            println!("✔ 检测到 {} 个Excel文件\n", files.len());
            if files.is_empty() {
                return Ok(());
            }

            let items = batch::run_batch(&files, &config, &format, output.as_deref());
            let mut failures = 0;
            for item in &items {
                match &item.outcome {
                    Ok(summary) => println!(
                        "✔ {}：异常项目 {} 个{}",
                        item.input.display(),
                        summary.exception_projects,
                        if summary.failed_rules > 0 {
                            format!("（{} 条规则失败）", summary.failed_rules)
                        } else {
                            String::new()
                        }
                    ),
                    Err(message) => {
                        failures += 1;
                        println!("✘ {}：{}", item.input.display(), message);
                    }
                }
            }

            println!("\n✅ 批量分析完成（成功 {} / 失败 {}）", items.len() - failures, failures);
        }

        Commands::Columns { input, sheet } => {
            let config = load_config(cli.config.as_deref(), None)?;
            let table = ingest::load_table(&input, sheet.as_deref(), &config.source_layout())
                .with_context(|| format!("读取失败: {}", input.display()))?;

            println!("列名（{} 列）:", table.columns().len());
            for (i, name) in table.columns().iter().enumerate() {
                println!("  {:>3}. {}", i + 1, name);
            }

            println!("\n逻辑列定位:");
            for logical in LOGICAL_COLUMNS {
                match resolve_in(table.columns(), logical) {
                    Ok(index) => println!("  ✔ {} → {}", logical, table.columns()[index]),
                    Err(e) => println!("  ✘ {}", e),
                }
            }
        }

        Commands::Config { show, init } => {
            let config = load_config(cli.config.as_deref(), None)?;

            if init {
                let path = Config::config_path()?;
                let overwrite = !path.exists()
                    || Confirm::new()
                        .with_prompt(format!("{} 已存在，是否覆盖？", path.display()))
                        .default(false)
                        .interact()?;
                if overwrite {
                    let path = Config::default().save()?;
                    println!("✔ 已写出设置: {}", path.display());
                }
            }

            if show || !init {
                println!("设置:");
                println!("  表头起始行: {}", config.header_row);
                println!("  表头行数: {}", config.header_depth);
                println!("  输出格式: {}", config.format);
                println!(
                    "  输出目录: {}",
                    config
                        .output_dir
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "（输入文件所在目录）".to_string())
                );
                println!("  项目标识列: {}", config.audit.project_column);
                println!(
                    "  施工类别: {}",
                    config.audit.categories.construction_categories.join("、")
                );
                println!("  规则:");
                for rule in &config.audit.rules {
                    println!("    - {}（{}）", rule.sheet_name, rule.params.kind());
                }
            }
        }
    }

    Ok(())
}
