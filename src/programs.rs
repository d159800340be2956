use solana_pubkey::Pubkey;

/// SPL no-op program, the log sink for account-compression change logs.
pub const SPL_NOOP_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");
pub const SPL_ACCOUNT_COMPRESSION_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("cmtDvXumGCrqC1Age74AVPhSRVXJMd8PJS91L8KbNCK");
pub const BUBBLEGUM_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY");
