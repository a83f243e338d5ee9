pub mod folha;
pub mod g1;
pub mod uol_tilt;

pub use folha::FolhaTecCollector;
pub use g1::G1TecnologiaCollector;
pub use uol_tilt::UolTiltCollector;
