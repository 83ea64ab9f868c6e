//! Unit tests for the orchestrators, driven by scripted spawners.
