use astro_fortune::adapters::{
    download_client, ensure_kernel_for, NominatimResolver, OpenAiChatClient, TerminalSink,
};
use astro_fortune::utils::error::ErrorSeverity;
use astro_fortune::utils::{logger, validation::Validate};
use astro_fortune::{AppConfig, CliConfig, EphemerisReader, FortuneNarrator, FortuneSession, Result};
use chrono::Utc;
use clap::Parser;
use std::path::Path;

async fn run(cli: CliConfig) -> Result<()> {
    cli.validate()?;

    let config = AppConfig::load_or_default(&cli.config)?;
    config.validate()?;
    let locale = cli.locale.unwrap_or(config.display.locale);

    // 沒有 API key 就不啟動
    let api_key = config.resolve_api_key()?;

    let submission = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut prompt_out = std::io::stdout();
        cli.form()
            .complete(&mut input, &mut prompt_out, Utc::now(), !cli.no_input, locale)?
    };
    tracing::debug!("Submission: {:?}", submission);

    // 日期不合法就不下載 kernel
    let kernel_path = Path::new(&config.ephemeris.path);
    let kernel_client = download_client(&config.ephemeris, &config.geocoding.user_agent)?;
    ensure_kernel_for(
        &submission,
        &kernel_client,
        kernel_path,
        config.ephemeris.download_url(),
    )
    .await?;

    let resolver = NominatimResolver::new(&config.geocoding)?;
    let chat = OpenAiChatClient::new(&config.llm, api_key)?;
    let narrator =
        FortuneNarrator::with_system_prompt(chat, &config.llm.language, &config.llm.system_prompt);
    let session = FortuneSession::new(resolver, EphemerisReader::new(kernel_path), narrator)
        .with_fallback(config.fallback.place());

    let mut sink = TerminalSink::new(std::io::stdout(), locale);
    session.submit(&submission, &mut sink).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting astro-fortune");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
