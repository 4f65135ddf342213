pub mod buildpack_toml;
