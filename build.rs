// build.rs
use std::path::Path;

fn main() {
    let proto_file = "proto/form_parser.proto";

    // 验证 proto 文件存在
    if !Path::new(proto_file).exists() {
        panic!("Proto file not found: {}", proto_file);
    }

    println!("cargo:rerun-if-changed={}", proto_file);

    // Codegen runs only for the `with-proto` feature; the default build must
    // never require protoc.
    if std::env::var_os("CARGO_FEATURE_WITH_PROTO").is_none() {
        return;
    }

    if let Err(e) = tonic_build::compile_protos(proto_file) {
        eprintln!(
            "Warning: Failed to compile protos: {}. The gRPC service will be unavailable.",
            e
        );
    }
}
