/// Column names
pub const ID_COLUMN: &str = "id";
pub const EASTING_COLUMN: &str = "x";
pub const NORTHING_COLUMN: &str = "y";

/// Non-data columns dropped from variable sheets when present
pub const DEFAULT_EXCLUDED_COLUMNS: [&str; 2] = ["Z", "zona"];

/// Coordinates workbook layout
pub const DEFAULT_COORDINATES_SHEET: &str = "Coordenadas";
pub const DEFAULT_COORDINATES_HEADER_ROW: usize = 1;

/// UTM zone of the surveyed area
pub const DEFAULT_ZONE_NUMBER: u8 = 23;
pub const DEFAULT_ZONE_LETTER: char = 'K';

/// Sampling date column pattern (MM_DD_YYYY)
pub const SAMPLE_DATE_FORMAT: &str = "%m_%d_%Y";

/// Downloadable artifact
pub const DEFAULT_ARTIFACT_FILE_NAME: &str = "GRUGEM1N1.B0.20150105.000000.nc";
pub const DEFAULT_ARTIFACT_MIME: &str = "application/netcdf";

/// Configuration
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";
pub const CONFIG_ENV_PREFIX: &str = "SENSOR_DASHBOARD";

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
