//! Benchmark helper utilities for kairu-rs
//!
//! This module generates synthetic character files so the benchmarks run
//! without shipping real `.ACS` files. The generated files exercise every
//! chunk: a full 256 color palette, one compressed image per frame, a handful
//! of sounds and animations that branch into each other.

/// Magic number of the container
const MAGIC: u32 = 0xABCD_ABC3;

/// Little-endian writer with locator back-patching.
#[derive(Default)]
struct Writer {
	data: Vec<u8>,
}

impl Writer {
	fn pos(&self) -> usize {
		self.data.len()
	}

	fn u8(&mut self, v: u8) {
		self.data.push(v);
	}

	fn u16(&mut self, v: u16) {
		self.data.extend_from_slice(&v.to_le_bytes());
	}

	fn i16(&mut self, v: i16) {
		self.data.extend_from_slice(&v.to_le_bytes());
	}

	fn u32(&mut self, v: u32) {
		self.data.extend_from_slice(&v.to_le_bytes());
	}

	fn bytes(&mut self, v: &[u8]) {
		self.data.extend_from_slice(v);
	}

	fn string(&mut self, s: &str) {
		let units: Vec<u16> = s.encode_utf16().collect();
		self.u32(units.len() as u32);
		for unit in &units {
			self.u16(*unit);
		}
		if !units.is_empty() {
			self.u16(0);
		}
	}

	fn locator(&mut self) -> usize {
		let at = self.pos();
		self.u32(0);
		self.u32(0);
		at
	}

	fn patch(&mut self, at: usize, start: usize) {
		let size = (self.pos() - start) as u32;
		self.data[at..at + 4].copy_from_slice(&(start as u32).to_le_bytes());
		self.data[at + 4..at + 8].copy_from_slice(&size.to_le_bytes());
	}
}

/// Bit writer matching the decompressor's bit order (LSB first).
#[derive(Default)]
struct BitWriter {
	bytes: Vec<u8>,
	bit_pos: usize,
}

impl BitWriter {
	fn bit(&mut self, bit: bool) {
		if self.bit_pos % 8 == 0 {
			self.bytes.push(0);
		}
		if bit {
			let last = self.bytes.len() - 1;
			self.bytes[last] |= 1 << (self.bit_pos % 8);
		}
		self.bit_pos += 1;
	}

	fn bits(&mut self, value: u32, count: u32) {
		for shift in 0..count {
			self.bit((value >> shift) & 1 == 1);
		}
	}

	fn literal(&mut self, byte: u8) {
		self.bit(false);
		self.bits(u32::from(byte), 8);
	}

	/// Back-reference with `distance` in `1..=4672` and `length` in `2..=4096`.
	fn copy(&mut self, distance: usize, length: usize) {
		self.bit(true);
		let (ones, width, bias) = match distance {
			1..=64 => (0, 6, 1),
			65..=576 => (1, 9, 65),
			_ => (2, 12, 577),
		};
		for _ in 0..ones {
			self.bit(true);
		}
		self.bit(false);
		self.bits((distance - bias) as u32, width);

		let rest = length - 2;
		let prefix = usize::BITS - 1 - (rest + 1).leading_zeros();
		for _ in 0..prefix {
			self.bit(true);
		}
		self.bit(false);
		self.bits((rest - ((1 << prefix) - 1)) as u32, prefix);
	}

	fn end(mut self) -> Vec<u8> {
		for _ in 0..4 {
			self.bit(true);
		}
		self.bits(0xF_FFFF, 20);
		self.bytes
	}
}

/// Padded row length of an image `width` pixels wide.
pub fn row_stride(width: u16) -> usize {
	(usize::from(width) + 3) & !3
}

/// Generates a compressed image of horizontal color bands.
///
/// Each row is a literal followed by a run of the same color; every second
/// row copies the row below it, exercising both short and long distances.
pub fn generate_compressed_image(width: u16, height: u16, seed: u8) -> Vec<u8> {
	let stride = row_stride(width);
	let mut writer = BitWriter::default();
	writer.bits(0, 8);

	for row in 0..usize::from(height) {
		if row % 2 == 1 && stride <= 4672 {
			copy_run(&mut writer, stride, stride);
		} else {
			writer.literal(seed.wrapping_add(row as u8));
			copy_run(&mut writer, 1, stride - 1);
		}
	}
	writer.end()
}

/// Copies `length >= 2` bytes from `distance` back in chunks the format can express.
fn copy_run(writer: &mut BitWriter, distance: usize, mut length: usize) {
	while length > 0 {
		let chunk = length.min(4096);
		// keep at least two bytes for the final copy
		let chunk = if length - chunk == 1 {
			chunk - 1
		} else {
			chunk
		};
		writer.copy(distance, chunk);
		length -= chunk;
	}
}

/// Generates a character file with `animations` animations of `frames`
/// frames each, every frame using its own `width x height` compressed image.
///
/// Animation 0 is `RestPose`, the last one is `Hide`, the others are idle
/// animations returning to `RestPose`.
pub fn generate_test_acs_data(animations: usize, frames: usize, width: u16, height: u16) -> Vec<u8> {
	let mut w = Writer::default();
	w.u32(MAGIC);
	let directory: Vec<usize> = (0..4).map(|_| w.locator()).collect();

	// character info
	let start = w.pos();
	w.u16(2);
	w.u16(2);
	let localized_at = w.locator();
	w.bytes(&[0x42; 16]);
	w.u16(width);
	w.u16(height);
	w.u8(0);
	w.u32(0x0000_0200);
	w.u16(1);
	w.u16(0);
	// balloon
	w.u8(2);
	w.u8(32);
	w.bytes(&[0x00, 0x00, 0x00, 0x00]);
	w.bytes(&[0xE1, 0xFF, 0xFF, 0x00]);
	w.bytes(&[0x00, 0x00, 0x00, 0x00]);
	w.string("MS Sans Serif");
	w.u32(-13i32 as u32);
	w.u32(400);
	w.u8(0);
	w.u8(0);
	// palette
	w.u32(256);
	for i in 0..=255u8 {
		w.bytes(&[i.wrapping_mul(3), i.wrapping_mul(2), i, 0x00]);
	}
	// tray icon, groups
	w.u8(0);
	w.u16(0);
	w.patch(directory[0], start);

	let start = w.pos();
	w.u16(1);
	w.u16(0x0409);
	w.string("Bench");
	w.string("Synthetic character");
	w.string("");
	w.patch(localized_at, start);

	let names: Vec<String> = (0..animations.max(2))
		.map(|i| match i {
			0 => "RestPose".to_string(),
			i if i == animations.max(2) - 1 => "Hide".to_string(),
			i => format!("Idle1_{i}"),
		})
		.collect();

	// animation table
	let start = w.pos();
	w.u32(names.len() as u32);
	let mut records = Vec::new();
	for name in &names {
		w.string(&name.to_uppercase());
		records.push(w.locator());
	}
	w.patch(directory[1], start);
	let mut image_count = 0u32;
	for (i, (name, at)) in names.iter().zip(records).enumerate() {
		let start = w.pos();
		w.string(name);
		let return_name = if i == 0 || i == names.len() - 1 {
			""
		} else {
			"RestPose"
		};
		w.u8(if return_name.is_empty() {
			2
		} else {
			0
		});
		w.string(return_name);
		w.u16(frames as u16);
		for f in 0..frames {
			w.u16(1);
			w.u32(image_count);
			w.i16(0);
			w.i16(0);
			image_count += 1;
			w.u16(if f == 0 {
				(i % 4) as u16
			} else {
				0xFFFF
			});
			w.u16(10);
			w.i16(if f + 1 < frames {
				(frames - 1) as i16
			} else {
				-1
			});
			if f == frames / 2 && frames > 1 {
				w.u8(1);
				w.u16(0);
				w.u16(25);
			} else {
				w.u8(0);
			}
			w.u8(0);
		}
		w.patch(at, start);
	}

	// image table
	let start = w.pos();
	w.u32(image_count);
	let mut records = Vec::new();
	for _ in 0..image_count {
		records.push(w.locator());
		w.u32(0);
	}
	w.patch(directory[2], start);
	for (i, at) in records.into_iter().enumerate() {
		let data = generate_compressed_image(width, height, i as u8);
		let start = w.pos();
		w.u8(0);
		w.u16(width);
		w.u16(height);
		w.u8(1);
		w.u32(data.len() as u32);
		w.bytes(&data);
		w.patch(at, start);
	}

	// audio table
	let start = w.pos();
	w.u32(4);
	let mut records = Vec::new();
	for _ in 0..4 {
		records.push(w.locator());
		w.u32(0);
	}
	w.patch(directory[3], start);
	for at in records {
		let start = w.pos();
		w.bytes(b"RIFF\x04\x00\x00\x00WAVE");
		w.patch(at, start);
	}

	w.data
}

/// Common benchmark sizes for synthetic test data
pub mod sizes {
	/// Small character frame: 64x64
	pub const SMALL: (u16, u16) = (64, 64);
	/// Typical character frame: 128x128
	pub const TYPICAL: (u16, u16) = (128, 128);
	/// Large character frame: 256x256
	pub const LARGE: (u16, u16) = (256, 256);
}

#[cfg(test)]
mod tests {
	use kairu_types::file::acs::{self, compression};

	use super::*;

	#[test]
	fn test_generated_image_decompresses() {
		for &(width, height) in &[(1, 1), (3, 5), sizes::SMALL, (2000, 3)] {
			let data = generate_compressed_image(width, height, 7);
			let pixels = compression::decompress(&data, row_stride(width) * usize::from(height))
				.unwrap();
			assert_eq!(pixels[0], 7);
		}
	}

	#[test]
	fn test_generated_file_decodes() {
		let data = generate_test_acs_data(5, 4, 32, 32);
		let definition = acs::decode(&data).unwrap();

		assert_eq!(definition.states().len(), 5);
		assert_eq!(definition.images().len(), 20);
		assert_eq!(definition.sounds().len(), 4);
		assert_eq!(definition.palette().len(), 256);
		assert_eq!(definition.state_name(definition.roles().exit_state), "Hide");
	}
}
