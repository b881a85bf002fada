//! Layout constants and runtime configuration defaults

// Composite image layout: reference | gap | observation
/// Side length of each square region in pixels
pub const REGION_SIZE: usize = 500;
/// First column of the observation region
pub const OBSERVATION_COLUMN_OFFSET: usize = 510;
/// First column of the reference region
pub const REFERENCE_COLUMN_OFFSET: usize = 0;
/// First row of both regions
pub const REGION_ROW_OFFSET: usize = 0;

// Background conventions per mode
/// Background value for opaque images (white on channel 0)
pub const OPAQUE_BACKGROUND: u8 = 255;
/// Background value for transparent images (zero alpha)
pub const TRANSPARENT_BACKGROUND: u8 = 0;

// Coarse aggregation
/// Number of grid cells along each axis of a region
pub const GRID_CELLS: usize = 10;
/// Number of largest values averaged for the top errors
pub const TOP_K: usize = 5;

// Calibration tuned to the 500x500 / 10x10 layout; 5 == 500 / 100 per cell average
/// Divisor applied to the averaged top cell maxima
pub const CELL_SCALE_DIVISOR: f64 = 5.0;
/// Linear dimension that distance percentages are normalized against
pub const NORMALIZATION_BASE: f64 = 500.0;

/// Distance value of a cell not yet reached by the wave expansion
pub const UNREACHED: u32 = u32::MAX;

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Report defaults
/// Number of worst images listed in a batch report
pub const DEFAULT_WORST_COUNT: usize = 2;
/// Number of best images listed in a batch report
pub const DEFAULT_BEST_COUNT: usize = 2;
/// Extension of images picked up from a target directory
pub const IMAGE_EXTENSION: &str = "png";
