pub mod jsondude_cli;
