use std::{fs::File, io::Read};

// Decode a hex string, whitespace between digits is ignored.
pub fn hex_to_bytes(content: &str) -> Vec<u8> {
    let digits: Vec<u8> = content
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    digits
        .chunks(2)
        .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
        .collect()
}

pub fn file_to_packet(fname: &str) -> Vec<u8> {
    // The test is executed under the crate root directory.
    let mut program_path = std::env::current_dir().unwrap();
    program_path.push("tests");
    program_path.push("packet_examples");
    program_path.push(fname);

    let mut file = File::open(program_path).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    hex_to_bytes(&content)
}

#[allow(dead_code)]
pub fn to_hex_dump(buf: &[u8]) {
    for (i, line) in buf.chunks(16).enumerate() {
        print!("{:08x} ", i * 16);
        for b in line {
            print!("{:02x} ", b);
        }
        println!();
    }
}
