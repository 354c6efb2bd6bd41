use tickcraft::prelude::*;

fn main() {
    smol::block_on(element!(Counter(color: Color::Cyan)).render_loop()).unwrap();
}
