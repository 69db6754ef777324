mod compression;
mod header;
mod roundtrip;
