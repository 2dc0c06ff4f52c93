// src/backups/tests/mod.rs
