// src/backend/utils/log.rs
// Canister builds print through ic_cdk; native builds (tests, tooling) write to stderr.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        ic_cdk::println!("INFO: {}", format_args!($($arg)*));
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("INFO: {}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(target_arch = "wasm32")]
        ic_cdk::eprintln!("ERROR: {}", format_args!($($arg)*));
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("ERROR: {}", format_args!($($arg)*));
    }};
}
