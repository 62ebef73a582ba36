//! Builds complete Opera volumes in memory

/// A file or directory to place on the volume
#[derive(Debug, Clone)]
pub enum Node {
    File { name: String, data: Vec<u8> },
    Dir { name: String, children: Vec<Node> },
}

impl Node {
    pub fn file(name: &str, data: Vec<u8>) -> Self {
        Node::File {
            name: name.to_string(),
            data,
        }
    }

    pub fn dir(name: &str, children: Vec<Node>) -> Self {
        Node::Dir {
            name: name.to_string(),
            children,
        }
    }
}

/// Where a node landed
struct Placed {
    name: String,
    kind: PlacedKind,
    /// First block of every copy; copy 0 is canonical
    copies: Vec<u32>,
    blocks: u32,
}

enum PlacedKind {
    File(Vec<u8>),
    Dir(Vec<Placed>),
}

pub struct ImageBuilder {
    label: String,
    block_size: u32,
    root: Vec<Node>,
    root_copies: u32,
    entry_copies: u32,
    entries_per_block: usize,
}

impl ImageBuilder {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            block_size: 2048,
            root: Vec::new(),
            root_copies: 2,
            entry_copies: 1,
            entries_per_block: 16,
        }
    }

    pub fn add(mut self, node: Node) -> Self {
        self.root.push(node);
        self
    }

    pub fn block_size(mut self, block_size: u32) -> Self {
        self.block_size = block_size;
        self
    }

    /// Number of root directory copies recorded in the root header
    pub fn root_copies(mut self, copies: u32) -> Self {
        self.root_copies = copies;
        self
    }

    /// Mirrors per entry (`M`); every entry gets `M + 1` pointers
    pub fn entry_copies(mut self, copies: u32) -> Self {
        self.entry_copies = copies;
        self
    }

    /// Split directories into chained blocks of at most this many entries
    pub fn entries_per_block(mut self, entries: usize) -> Self {
        self.entries_per_block = entries;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let bs = self.block_size as usize;
        // Block 0 holds the volume and root directory headers
        let mut next = 1u32;

        let root_blocks = self.dir_blocks(self.root.len());
        let root_copies: Vec<u32> = (0..self.root_copies.max(1))
            .map(|_| {
                let start = next;
                next += root_blocks;
                start
            })
            .collect();
        let root = self.place_all(&self.root, &mut next);

        let mut data = vec![0u8; next as usize * bs];

        // Volume header
        data[0] = 1;
        data[1..6].copy_from_slice(b"ZZZZZ");
        data[6] = 1;
        data[7] = 0;
        write_name(&mut data[8..40], "built by the operafs test suite");
        write_name(&mut data[40..72], &self.label);
        put_u32(&mut data[72..], 0x0BAD_CAFE);
        put_u32(&mut data[76..], self.block_size);
        put_u32(&mut data[80..], next);

        // Root directory header
        put_u32(&mut data[84..], 0x0000_0001);
        put_u32(&mut data[88..], root_blocks);
        put_u32(&mut data[92..], self.block_size);
        put_u32(&mut data[96..], self.root_copies);
        for (slot, block) in root_copies.iter().take(8).enumerate() {
            put_u32(&mut data[100 + slot * 4..], *block);
        }

        for start in &root_copies {
            self.write_dir(&mut data, *start, &root);
        }
        self.write_children(&mut data, &root);
        data
    }

    fn dir_blocks(&self, entries: usize) -> u32 {
        entries.max(1).div_ceil(self.entries_per_block) as u32
    }

    fn place_all(&self, nodes: &[Node], next: &mut u32) -> Vec<Placed> {
        nodes.iter().map(|node| self.place(node, next)).collect()
    }

    fn place(&self, node: &Node, next: &mut u32) -> Placed {
        let bs = self.block_size as usize;
        let (name, blocks) = match node {
            Node::File { name, data } => (name, (data.len().div_ceil(bs)).max(1) as u32),
            Node::Dir { name, children } => (name, self.dir_blocks(children.len())),
        };

        let copies = (0..=self.entry_copies)
            .map(|_| {
                let start = *next;
                *next += blocks;
                start
            })
            .collect();

        let kind = match node {
            Node::File { data, .. } => PlacedKind::File(data.clone()),
            Node::Dir { children, .. } => PlacedKind::Dir(self.place_all(children, next)),
        };

        Placed {
            name: name.clone(),
            kind,
            copies,
            blocks,
        }
    }

    fn write_children(&self, data: &mut [u8], placed: &[Placed]) {
        let bs = self.block_size as usize;
        for node in placed {
            match &node.kind {
                PlacedKind::File(content) => {
                    for start in &node.copies {
                        let offset = *start as usize * bs;
                        data[offset..offset + content.len()].copy_from_slice(content);
                    }
                }
                PlacedKind::Dir(children) => {
                    for start in &node.copies {
                        self.write_dir(data, *start, children);
                    }
                    self.write_children(data, children);
                }
            }
        }
    }

    fn write_dir(&self, data: &mut [u8], start: u32, entries: &[Placed]) {
        let bs = self.block_size as usize;
        let chunks: Vec<&[Placed]> = entries.chunks(self.entries_per_block).collect();
        let block_count = chunks.len();

        for (index, chunk) in chunks.iter().enumerate() {
            let block = (start as usize + index) * bs;
            let is_final_block = index + 1 == block_count;
            let mut cursor = block + 20;

            for (position, entry) in chunk.iter().enumerate() {
                let is_last = position + 1 == chunk.len();
                let flags = match (is_last, is_final_block) {
                    (true, true) => 0x8000_0000,
                    (true, false) => 0x4000_0000,
                    _ => 0,
                };
                cursor = self.write_entry(data, cursor, entry, flags);
            }

            let next_block = if is_final_block { -1 } else { index as i32 + 1 };
            let prev_block = if index == 0 { -1 } else { index as i32 - 1 };
            put_i32(&mut data[block..], next_block);
            put_i32(&mut data[block + 4..], prev_block);
            put_u32(&mut data[block + 8..], 0);
            put_u32(&mut data[block + 12..], (cursor - block) as u32);
            put_u32(&mut data[block + 16..], 20);
        }
    }

    fn write_entry(&self, data: &mut [u8], at: usize, entry: &Placed, flags: u32) -> usize {
        let (entry_type, byte_length) = match &entry.kind {
            PlacedKind::File(content) => (*b"    ", content.len() as u32),
            PlacedKind::Dir(_) => (*b"*dir", entry.blocks * self.block_size),
        };

        put_u32(&mut data[at..], flags);
        put_u32(&mut data[at + 4..], entry.copies[0]);
        data[at + 8..at + 12].copy_from_slice(&entry_type);
        put_u32(&mut data[at + 12..], self.block_size);
        put_u32(&mut data[at + 16..], byte_length);
        put_u32(&mut data[at + 20..], entry.blocks);
        put_u32(&mut data[at + 24..], 1);
        put_u32(&mut data[at + 28..], 0);
        write_name(&mut data[at + 32..at + 64], &entry.name);
        put_u32(&mut data[at + 64..], self.entry_copies);

        let mut cursor = at + 68;
        for copy in &entry.copies {
            put_u32(&mut data[cursor..], *copy);
            cursor += 4;
        }
        cursor
    }
}

fn put_u32(dst: &mut [u8], value: u32) {
    dst[..4].copy_from_slice(&value.to_be_bytes());
}

fn put_i32(dst: &mut [u8], value: i32) {
    dst[..4].copy_from_slice(&value.to_be_bytes());
}

fn write_name(dst: &mut [u8], name: &str) {
    let bytes = name.as_bytes();
    let len = bytes.len().min(dst.len());
    dst[..len].copy_from_slice(&bytes[..len]);
}
