use gfc_crypto::{chacha, ctr, gcm, generate_key, ChaChaVariant, KeyMaterial};

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt_gcm(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            gcm::encrypt(
                divan::black_box(&data),
                &KeyMaterial::Key(divan::black_box(key.as_bytes())),
            )
            .unwrap()
        });
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt_gcm(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let data = make_data(size);
    let sealed = gcm::encrypt(&data, &KeyMaterial::Key(key.as_bytes())).unwrap();
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            gcm::decrypt(
                divan::black_box(&sealed),
                &KeyMaterial::Key(divan::black_box(key.as_bytes())),
            )
            .unwrap()
        });
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt_xchacha(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            chacha::encrypt(
                ChaChaVariant::Extended,
                divan::black_box(&data),
                &KeyMaterial::Key(divan::black_box(key.as_bytes())),
            )
            .unwrap()
        });
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt_ctr(bencher: divan::Bencher, size: usize) {
    let key = generate_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| {
            ctr::encrypt(
                divan::black_box(&data),
                &KeyMaterial::Key(divan::black_box(key.as_bytes())),
            )
            .unwrap()
        });
}

fn main() {
    divan::main();
}
