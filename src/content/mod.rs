pub mod cast;

pub use cast::{
    cast_from_catalog, cast_from_names, load_cast_from_path, CastCatalog, CastLoadError,
    CastTemplate, APPEARANCES,
};
