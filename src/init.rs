use env_logger::Env;
use log::LevelFilter;

/// 初始化日誌；`debug` 為真時強制輸出除錯訊息，否則依 `RUST_LOG`，預設 info
pub fn init(debug: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp_secs();

    // 測試中可能重複初始化
    let _ = builder.try_init();
}
