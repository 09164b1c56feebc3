pub mod a001_manual;
