pub mod wppconnect;
