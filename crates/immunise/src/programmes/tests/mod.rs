mod common;
mod consent;
mod derive;
