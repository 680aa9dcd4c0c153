pub mod identity_header;
