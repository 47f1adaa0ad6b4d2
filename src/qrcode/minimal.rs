//! Minimal QR segmentation
//!
//! Computes a minimum-bit-length partition of an input string into QR
//! segments across the supported character sets and the four data modes.
//!
//! The search is a shortest path over a lattice of vertices
//! `(position, charset, mode)`, where position 0 lies left of the first
//! character and position n right of the last. An edge landing on a
//! vertex encodes one to three characters in the vertex's mode and
//! charset; its cost is the bit growth it causes, including mode headers
//! and ECI switches, which depend on the predecessor edge. After all
//! edges landing on a position are known, each `(charset, mode)` bucket
//! keeps only its cheapest edge, and only those are expanded further.
//!
//! When no version is preset, the lattice is solved once per version
//! class (1-9, 10-26, 27-40) because character count widths differ
//! between classes, and the smallest fitting solution wins.
//!
//! Rust port based on Java code from the ZXing library.
//! Original Java code copyright (C) 2021 ZXing authors.
//! Licensed under Apache License 2.0

use std::fmt;

use crate::qrcode::charset::{alphanumeric_code, is_double_byte_kanji, CharsetEncoder};
use crate::qrcode::mode::Mode;
use crate::qrcode::version::{EcLevel, Version};
use crate::{Error, Result};

/// Number of ISO-8859 parts the admission scan can reach: parts 1
/// through 15, minus the vacant 9, 11 and 12
const AVAILABLE_ISO_PARTS: usize = 12;

/// One edge of the search lattice, stored in a flat arena and linked to
/// its predecessor by arena index.
struct Edge {
    mode: Mode,
    from_position: usize,
    charset_index: usize,
    character_length: usize,
    previous: Option<usize>,
    /// Bit length of the whole path from the source up to and including
    /// this edge
    cached_total_size: usize,
}

/// One output segment. Order matches encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Segment mode
    pub mode: Mode,
    /// Index of the first input character covered by this segment
    pub from_position: usize,
    /// Index into the result's charset list; meaningful for byte and ECI
    /// segments
    pub charset_index: usize,
    /// Number of input characters covered; zero for control segments
    pub character_length: usize,
}

/// The minimal segmentation of an input string, together with the
/// version class it was solved for.
#[derive(Debug, Clone)]
pub struct ResultList {
    version: Version,
    ec_level: EcLevel,
    chars: Vec<char>,
    encoders: Vec<CharsetEncoder>,
    segments: Vec<Segment>,
}

/// Encoder that encodes minimally.
pub struct MinimalEncoder {
    chars: Vec<char>,
    is_gs1: bool,
    encoders: Vec<CharsetEncoder>,
    priority_encoder_index: Option<usize>,
    ec_level: EcLevel,
}

fn compacted_ordinal(mode: Mode) -> usize {
    match mode {
        Mode::Kanji => 0,
        Mode::Alphanumeric => 1,
        Mode::Numeric => 2,
        Mode::Byte => 3,
        _ => unreachable!("control modes never enter the lattice"),
    }
}

fn class_ceiling(version: Version) -> Version {
    match version.number() {
        1..=9 => Version::new(9),
        10..=26 => Version::new(26),
        _ => Version::new(40),
    }
}

impl MinimalEncoder {
    /// Encode the string minimally.
    ///
    /// When `version` is `None` the smallest encoding over the three
    /// version classes is chosen; otherwise the given version is used
    /// and its class checked for fit. When `priority_charset` is given
    /// and supported, any character it can encode is byte-encoded with
    /// it rather than with whichever charset is cheapest. With `is_gs1`
    /// a FNC1 segment is placed in first position.
    pub fn encode(
        text: &str,
        version: Option<Version>,
        priority_charset: Option<CharsetEncoder>,
        is_gs1: bool,
        ec_level: EcLevel,
    ) -> Result<ResultList> {
        Self::new(text, priority_charset, is_gs1, ec_level)?.encode_version(version)
    }

    /// Build the charset encoder set for the input.
    ///
    /// ISO-8859-1 is always in play. Walking the input, any character no
    /// live encoder can represent admits the first further ISO-8859 part
    /// that can. ISO encoders without a registered ECI cannot be
    /// announced and force the Unicode tail instead; the UTF-8 and
    /// UTF-16BE encoders are appended whenever more than the default
    /// charset is needed.
    fn new(
        text: &str,
        priority_charset: Option<CharsetEncoder>,
        is_gs1: bool,
        ec_level: EcLevel,
    ) -> Result<Self> {
        let chars: Vec<char> = text.chars().collect();

        // room for the ISO-8859 charsets 1 through 16; parts 9, 11 and
        // 12 stay vacant
        let mut iso_encoders: [Option<CharsetEncoder>; 15] = [None; 15];
        iso_encoders[0] = Some(CharsetEncoder::Latin1);
        let mut need_unicode_encoder =
            priority_charset.map_or(false, |charset| charset.name().starts_with("UTF"));

        for (position, &c) in chars.iter().enumerate() {
            let mut live = 0;
            let mut found = false;
            for encoder in iso_encoders.iter().flatten() {
                live += 1;
                if encoder.can_encode(c) {
                    found = true;
                    break;
                }
            }

            if live == AVAILABLE_ISO_PARTS {
                // every expressible ISO charset is already in play
                break;
            }

            if !found {
                let mut admitted = false;
                for (j, slot) in iso_encoders.iter_mut().enumerate() {
                    if slot.is_none() {
                        if let Some(encoder) = CharsetEncoder::iso_part(j as u8 + 1) {
                            if encoder.can_encode(c) {
                                *slot = Some(encoder);
                                admitted = true;
                                break;
                            }
                        }
                    }
                }
                if !admitted {
                    if !CharsetEncoder::Utf16Be.can_encode(c) {
                        return Err(Error::Unencodable(position));
                    }
                    need_unicode_encoder = true;
                }
            }
        }

        let mut number_of_encoders = 0;
        for encoder in iso_encoders.iter().flatten() {
            if encoder.eci().is_some() {
                number_of_encoders += 1;
            } else {
                need_unicode_encoder = true;
            }
        }

        let encoders = if number_of_encoders == 1 && !need_unicode_encoder {
            vec![CharsetEncoder::Latin1]
        } else {
            let mut list: Vec<CharsetEncoder> = Vec::with_capacity(number_of_encoders + 2);
            list.extend(
                iso_encoders
                    .iter()
                    .flatten()
                    .filter(|encoder| encoder.eci().is_some()),
            );
            list.push(CharsetEncoder::Utf8);
            list.push(CharsetEncoder::Utf16Be);
            list
        };

        let priority_encoder_index = priority_charset.and_then(|priority| {
            encoders
                .iter()
                .position(|encoder| encoder.name() == priority.name())
        });

        Ok(Self {
            chars,
            is_gs1,
            encoders,
            priority_encoder_index,
            ec_level,
        })
    }

    fn encode_version(&self, version: Option<Version>) -> Result<ResultList> {
        match version {
            None => {
                // compute the minimal encoding for all three version
                // classes and keep the smallest that fits
                let version_classes = [Version::new(9), Version::new(26), Version::new(40)];
                let mut results = Vec::with_capacity(version_classes.len());
                for &class_version in &version_classes {
                    results.push(self.encode_specific_version(class_version)?);
                }

                let mut smallest_size = usize::MAX;
                let mut smallest: Option<usize> = None;
                for (i, result) in results.iter().enumerate() {
                    let size = result.bit_size();
                    if Version::will_fit(size, version_classes[i], self.ec_level)
                        && size < smallest_size
                    {
                        smallest_size = size;
                        smallest = Some(i);
                    }
                }
                match smallest {
                    Some(index) => Ok(results.swap_remove(index)),
                    None => Err(Error::DataTooBig),
                }
            }
            Some(version) => {
                let result = self.encode_specific_version(version)?;
                if !Version::will_fit(
                    result.bit_size(),
                    class_ceiling(result.version),
                    self.ec_level,
                ) {
                    return Err(Error::DataTooBig);
                }
                Ok(result)
            }
        }
    }

    /// Solve the lattice for one version and reconstruct the segment
    /// list from the cheapest terminal edge.
    fn encode_specific_version(&self, version: Version) -> Result<ResultList> {
        let input_length = self.chars.len();
        let num_encoders = self.encoders.len();

        // one bucket per (position, charset, compacted mode), holding
        // the arena index of the cheapest edge seen so far
        let mut arena: Vec<Edge> = Vec::new();
        let mut buckets: Vec<Option<usize>> = vec![None; (input_length + 1) * num_encoders * 4];

        if input_length > 0 {
            self.add_edges(version, 0, None, &mut arena, &mut buckets);
        }

        for i in 1..=input_length {
            for j in 0..num_encoders {
                for k in 0..4 {
                    let bucket = (i * num_encoders + j) * 4 + k;
                    if let Some(edge_index) = buckets[bucket] {
                        if i < input_length {
                            self.add_edges(version, i, Some(edge_index), &mut arena, &mut buckets);
                        }
                    }
                }
            }
        }

        let mut minimal_size = usize::MAX;
        let mut minimal_index: Option<usize> = None;
        for j in 0..num_encoders {
            for k in 0..4 {
                let bucket = (input_length * num_encoders + j) * 4 + k;
                if let Some(edge_index) = buckets[bucket] {
                    let edge = &arena[edge_index];
                    if edge.cached_total_size < minimal_size {
                        minimal_size = edge.cached_total_size;
                        minimal_index = Some(edge_index);
                    }
                }
            }
        }

        if minimal_index.is_none() && input_length > 0 {
            return Err(Error::Internal("no path through the encoding lattice"));
        }
        Ok(self.post_process(minimal_index, version, &arena))
    }

    /// Emit all outgoing edges for the character at `from`
    fn add_edges(
        &self,
        version: Version,
        from: usize,
        previous: Option<usize>,
        arena: &mut Vec<Edge>,
        buckets: &mut [Option<usize>],
    ) {
        let c = self.chars[from];

        let mut start = 0;
        let mut end = self.encoders.len();
        if let Some(priority) = self.priority_encoder_index {
            if self.encoders[priority].can_encode(c) {
                start = priority;
                end = priority + 1;
            }
        }

        for i in start..end {
            if self.encoders[i].can_encode(c) {
                self.add_edge(version, Mode::Byte, from, i, 1, previous, arena, buckets);
            }
        }

        if is_double_byte_kanji(c) {
            self.add_edge(version, Mode::Kanji, from, 0, 1, previous, arena, buckets);
        }

        let input_length = self.chars.len();
        if alphanumeric_code(c).is_some() {
            let length = if from + 1 >= input_length
                || alphanumeric_code(self.chars[from + 1]).is_none()
            {
                1
            } else {
                2
            };
            self.add_edge(
                version,
                Mode::Alphanumeric,
                from,
                0,
                length,
                previous,
                arena,
                buckets,
            );
        }

        if c.is_ascii_digit() {
            let length = if from + 1 >= input_length || !self.chars[from + 1].is_ascii_digit() {
                1
            } else if from + 2 >= input_length || !self.chars[from + 2].is_ascii_digit() {
                2
            } else {
                3
            };
            self.add_edge(version, Mode::Numeric, from, 0, length, previous, arena, buckets);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_edge(
        &self,
        version: Version,
        mode: Mode,
        from_position: usize,
        charset_index: usize,
        character_length: usize,
        previous: Option<usize>,
        arena: &mut Vec<Edge>,
        buckets: &mut [Option<usize>],
    ) {
        let edge = self.new_edge(
            version,
            mode,
            from_position,
            charset_index,
            character_length,
            previous,
            arena,
        );
        let vertex = from_position + character_length;
        let bucket = (vertex * self.encoders.len() + edge.charset_index) * 4
            + compacted_ordinal(mode);
        // ties keep the first edge seen
        match buckets[bucket] {
            Some(existing) if arena[existing].cached_total_size <= edge.cached_total_size => {}
            _ => {
                arena.push(edge);
                buckets[bucket] = Some(arena.len() - 1);
            }
        }
    }

    /// Cost an edge against its predecessor.
    ///
    /// A mode header with its character count field is paid whenever the
    /// mode changes or an ECI switch intervenes; byte edges additionally
    /// pay the ECI header and assignment when their charset differs from
    /// the running charset.
    fn new_edge(
        &self,
        version: Version,
        mode: Mode,
        from_position: usize,
        charset_index: usize,
        character_length: usize,
        previous: Option<usize>,
        arena: &[Edge],
    ) -> Edge {
        // non-byte modes inherit the running charset
        let charset_index = match (mode, previous) {
            (Mode::Byte, _) | (_, None) => charset_index,
            (_, Some(p)) => arena[p].charset_index,
        };

        let prev = previous.map(|index| &arena[index]);
        let mut size = prev.map_or(0, |p| p.cached_total_size);

        let need_eci = mode == Mode::Byte
            && ((previous.is_none() && charset_index != 0)
                || prev.map_or(false, |p| charset_index != p.charset_index));

        if prev.map(|p| p.mode) != Some(mode) || need_eci {
            size += 4 + mode.character_count_bits(version) as usize;
        }

        match mode {
            Mode::Kanji => size += 13,
            Mode::Alphanumeric => size += if character_length == 1 { 6 } else { 11 },
            Mode::Numeric => {
                size += match character_length {
                    1 => 4,
                    2 => 7,
                    _ => 10,
                }
            }
            Mode::Byte => {
                let substring: String = self.chars
                    [from_position..from_position + character_length]
                    .iter()
                    .collect();
                size += 8 * self.encoders[charset_index].encoded_len(&substring);
                if need_eci {
                    size += 4 + 8; // the assignment numbers all fit eight bits
                }
            }
            _ => {}
        }

        Edge {
            mode,
            from_position,
            charset_index,
            character_length,
            previous,
            cached_total_size: size,
        }
    }

    /// Walk the solution path backwards collapsing same-mode runs into
    /// segments, insert ECI switches ahead of byte runs that need them,
    /// place the GS1 FNC1 marker, and close with a terminator.
    fn post_process(
        &self,
        solution: Option<usize>,
        version: Version,
        arena: &[Edge],
    ) -> ResultList {
        let mut segments: Vec<Segment> = Vec::new();
        let mut length = 0;
        let mut current = solution;
        while let Some(index) = current {
            let edge = &arena[index];
            length += edge.character_length;
            let previous = edge.previous;

            let need_eci = edge.mode == Mode::Byte
                && ((previous.is_none() && edge.charset_index != 0)
                    || previous.map_or(false, |p| edge.charset_index != arena[p].charset_index));

            let on_boundary = match previous {
                None => true,
                Some(p) => arena[p].mode != edge.mode,
            };
            if on_boundary || need_eci {
                segments.insert(
                    0,
                    Segment {
                        mode: edge.mode,
                        from_position: edge.from_position,
                        charset_index: edge.charset_index,
                        character_length: length,
                    },
                );
                length = 0;
            }

            if need_eci {
                segments.insert(
                    0,
                    Segment {
                        mode: Mode::Eci,
                        from_position: edge.from_position,
                        charset_index: edge.charset_index,
                        character_length: 0,
                    },
                );
            }
            current = previous;
        }

        if self.is_gs1 {
            if let Some(first) = segments.first() {
                if first.mode != Mode::Eci && segments.iter().any(|s| s.mode == Mode::Eci) {
                    // prepend a default character set ECI
                    segments.insert(
                        0,
                        Segment {
                            mode: Mode::Eci,
                            from_position: 0,
                            charset_index: 0,
                            character_length: 0,
                        },
                    );
                }
            }
            let insert_at = match segments.first() {
                Some(first) if first.mode == Mode::Eci => 1,
                _ => 0,
            };
            segments.insert(
                insert_at,
                Segment {
                    mode: Mode::Fnc1FirstPosition,
                    from_position: 0,
                    charset_index: 0,
                    character_length: 0,
                },
            );
        }

        segments.push(Segment {
            mode: Mode::Terminator,
            from_position: self.chars.len(),
            charset_index: 0,
            character_length: 0,
        });

        ResultList {
            version,
            ec_level: self.ec_level,
            chars: self.chars.clone(),
            encoders: self.encoders.clone(),
            segments,
        }
    }
}

impl ResultList {
    /// The segments in encoding order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The charset list segment `charset_index` fields refer to
    pub fn charset(&self, index: usize) -> CharsetEncoder {
        self.encoders[index]
    }

    /// Total encoded size in bits
    pub fn bit_size(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| self.segment_size(segment))
            .sum()
    }

    /// Size of one segment in bits: mode header, character count field
    /// and payload
    fn segment_size(&self, segment: &Segment) -> usize {
        let mut size = 4 + segment.mode.character_count_bits(self.version) as usize;
        match segment.mode {
            Mode::Kanji => size += 13 * segment.character_length,
            Mode::Alphanumeric => {
                size += (segment.character_length / 2) * 11;
                size += if segment.character_length % 2 == 1 { 6 } else { 0 };
            }
            Mode::Numeric => {
                size += (segment.character_length / 3) * 10;
                size += match segment.character_length % 3 {
                    1 => 4,
                    2 => 7,
                    _ => 0,
                };
            }
            Mode::Byte => size += 8 * self.character_count_indicator(segment),
            Mode::Eci => size += 8,
            _ => {}
        }
        size
    }

    /// The value of the character count field: the encoded byte length
    /// for byte segments, the covered character count otherwise
    pub fn character_count_indicator(&self, segment: &Segment) -> usize {
        if segment.mode == Mode::Byte {
            let substring: String = self.chars
                [segment.from_position..segment.from_position + segment.character_length]
                .iter()
                .collect();
            self.encoders[segment.charset_index].encoded_len(&substring)
        } else {
            segment.character_length
        }
    }

    /// The smallest version within the solved class whose capacity holds
    /// the bit stream at the result's error correction level
    pub fn version(&self) -> Version {
        let (lower_limit, upper_limit) = match self.version.number() {
            1..=9 => (1, 9),
            10..=26 => (10, 26),
            _ => (27, 40),
        };
        let size = self.bit_size();
        let mut number = self.version.number();
        // grow until the data fits, then shrink back while it still does
        while number < upper_limit && !Version::will_fit(size, Version::new(number), self.ec_level)
        {
            number += 1;
        }
        while number > lower_limit
            && Version::will_fit(size, Version::new(number - 1), self.ec_level)
        {
            number -= 1;
        }
        Version::new(number)
    }
}

impl fmt::Display for ResultList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            let name = match segment.mode {
                Mode::Numeric => "NUMERIC",
                Mode::Alphanumeric => "ALPHANUMERIC",
                Mode::Byte => "BYTE",
                Mode::Kanji => "KANJI",
                Mode::Eci => "ECI",
                Mode::Fnc1FirstPosition => "FNC1_FIRST_POSITION",
                Mode::Terminator => "TERMINATOR",
            };
            write!(f, "{name}(")?;
            if segment.mode == Mode::Eci {
                write!(f, "{}", self.encoders[segment.charset_index].name())?;
            } else {
                for &c in &self.chars
                    [segment.from_position..segment.from_position + segment.character_length]
                {
                    if (' '..='~').contains(&c) {
                        write!(f, "{c}")?;
                    } else {
                        write!(f, ".")?;
                    }
                }
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
