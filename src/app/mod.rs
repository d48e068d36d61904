pub mod seed_import;
