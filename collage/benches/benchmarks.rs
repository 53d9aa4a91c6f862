// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::io::Cursor;

use collage::{
    AuthorExtractor, Avatar, CollageConfig, CollageFigure, ConfigLayer, HandleSet, build_client,
    build_roster,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

fn benchmark_extract_handles(c: &mut Criterion,)
{
    let client = build_client().expect("client failed",);
    let extractor =
        AuthorExtractor::new(client, "https://raw.githubusercontent.com", "main", "AUTHORS.rst",)
            .expect("extractor failed",);

    let mut authors = String::from("Authors\n=======\n\n",);
    for i in 0..500 {
        authors.push_str(&format!("- Contributor Number {i}, (`@user-{i} <https://github.com/user-{i}>`_)\n"),);
    }

    c.bench_function("extract_500_handles", |b| {
        b.iter(|| black_box(extractor.extract_handles(black_box(&authors,),).len(),),)
    },);
}

fn benchmark_build_roster(c: &mut Criterion,)
{
    let contributors: Vec<String,> = (0..1000).map(|i| format!("Contributor-{i}"),).collect();
    let authors: Vec<String,> = (500..1500).map(|i| format!("contributor-{i}"),).collect();
    let ignore: HandleSet = (0..1000).step_by(7,).map(|i| format!("contributor-{i}"),).collect();
    let include: HandleSet = ["octocat", "hubot",].into_iter().collect();

    c.bench_function("build_roster_overlapping_sets", |b| {
        b.iter(|| {
            let roster = build_roster(
                black_box(&contributors,).iter().cloned(),
                black_box(&authors,).iter().cloned(),
                &ignore,
                &include,
            );
            black_box(roster.len(),)
        },)
    },);
}

fn benchmark_resolve_config(c: &mut Criterion,)
{
    let yaml = r"
organization: octo-org
repositories: [alpha, beta, gamma, delta]
extend_ignore: [dependabot, renovate-bot]
include: [octocat]
ncols: 5
dpi: 144
";

    c.bench_function("resolve_config_from_yaml", |b| {
        b.iter(|| {
            let layer = ConfigLayer::parse(black_box(yaml,),).expect("parse failed",);
            CollageConfig::resolve(None, &[layer,],).expect("resolve failed",)
        },)
    },);
}

fn benchmark_svg_composition(c: &mut Criterion,)
{
    let image = RgbaImage::from_pixel(64, 64, Rgba([40, 90, 160, 255,],),);
    let mut buffer = Cursor::new(Vec::new(),);
    DynamicImage::ImageRgba8(image,).write_to(&mut buffer, ImageFormat::Png,).expect("encode failed",);
    let bytes = buffer.into_inner();

    let avatars: Vec<Avatar,> =
        (0..21).map(|i| Avatar::decode(&format!("user-{i}"), &bytes,).expect("decode failed",),).collect();
    let figure = CollageFigure::new(avatars, 7, 18.0,).expect("figure failed",);

    c.bench_function("compose_svg_21_avatars", |b| {
        b.iter(|| black_box(figure.to_svg().expect("svg failed",).len(),),)
    },);
}

criterion_group!(
    benches,
    benchmark_extract_handles,
    benchmark_build_roster,
    benchmark_resolve_config,
    benchmark_svg_composition
);
criterion_main!(benches);
