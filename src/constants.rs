/// Page/frame size used when none is configured
pub const DEFAULT_PAGE_SIZE: i64 = 1024;

/// Frame count used by the demo run and the CLI default
pub const DEFAULT_NUM_FRAMES: i64 = 100;

/// Output value written for a failed translation
pub const INVALID_ADDRESS: i64 = -1;

/// Address translated by the demo run when no input file is given
pub const DEMO_ADDRESS: i64 = 1234;
