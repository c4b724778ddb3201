// 该文件是 Gewu （格物致知） 项目的一部分。
// src/model/labels.rs - COCO 类别标签
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use crate::model::WithLabel;

/// COCO 数据集 80 类标签名，按连续类别 id 顺序排列
const COCO_CLASS_NAMES: [&str; 80] = [
  "person",
  "bicycle",
  "car",
  "motorcycle",
  "airplane",
  "bus",
  "train",
  "truck",
  "boat",
  "traffic light",
  "fire hydrant",
  "stop sign",
  "parking meter",
  "bench",
  "bird",
  "cat",
  "dog",
  "horse",
  "sheep",
  "cow",
  "elephant",
  "bear",
  "zebra",
  "giraffe",
  "backpack",
  "umbrella",
  "handbag",
  "tie",
  "suitcase",
  "frisbee",
  "skis",
  "snowboard",
  "sports ball",
  "kite",
  "baseball bat",
  "baseball glove",
  "skateboard",
  "surfboard",
  "tennis racket",
  "bottle",
  "wine glass",
  "cup",
  "fork",
  "knife",
  "spoon",
  "bowl",
  "banana",
  "apple",
  "sandwich",
  "orange",
  "broccoli",
  "carrot",
  "hot dog",
  "pizza",
  "donut",
  "cake",
  "chair",
  "couch",
  "potted plant",
  "bed",
  "dining table",
  "toilet",
  "tv",
  "laptop",
  "mouse",
  "remote",
  "keyboard",
  "cell phone",
  "microwave",
  "oven",
  "toaster",
  "sink",
  "refrigerator",
  "book",
  "clock",
  "vase",
  "scissors",
  "teddy bear",
  "hair drier",
  "toothbrush",
];

/// COCO 数据集类别标签
///
/// 判别值即连续类别 id（0 至 79）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CocoLabel {
  Person = 0,
  Bicycle,
  Car,
  Motorcycle,
  Airplane,
  Bus,
  Train,
  Truck,
  Boat,
  TrafficLight,
  FireHydrant,
  StopSign,
  ParkingMeter,
  Bench,
  Bird,
  Cat,
  Dog,
  Horse,
  Sheep,
  Cow,
  Elephant,
  Bear,
  Zebra,
  Giraffe,
  Backpack,
  Umbrella,
  Handbag,
  Tie,
  Suitcase,
  Frisbee,
  Skis,
  Snowboard,
  SportsBall,
  Kite,
  BaseballBat,
  BaseballGlove,
  Skateboard,
  Surfboard,
  TennisRacket,
  Bottle,
  WineGlass,
  Cup,
  Fork,
  Knife,
  Spoon,
  Bowl,
  Banana,
  Apple,
  Sandwich,
  Orange,
  Broccoli,
  Carrot,
  HotDog,
  Pizza,
  Donut,
  Cake,
  Chair,
  Couch,
  PottedPlant,
  Bed,
  DiningTable,
  Toilet,
  Tv,
  Laptop,
  Mouse,
  Remote,
  Keyboard,
  CellPhone,
  Microwave,
  Oven,
  Toaster,
  Sink,
  Refrigerator,
  Book,
  Clock,
  Vase,
  Scissors,
  TeddyBear,
  HairDrier,
  Toothbrush,
}

const COCO_LABELS: [CocoLabel; 80] = [
  CocoLabel::Person,
  CocoLabel::Bicycle,
  CocoLabel::Car,
  CocoLabel::Motorcycle,
  CocoLabel::Airplane,
  CocoLabel::Bus,
  CocoLabel::Train,
  CocoLabel::Truck,
  CocoLabel::Boat,
  CocoLabel::TrafficLight,
  CocoLabel::FireHydrant,
  CocoLabel::StopSign,
  CocoLabel::ParkingMeter,
  CocoLabel::Bench,
  CocoLabel::Bird,
  CocoLabel::Cat,
  CocoLabel::Dog,
  CocoLabel::Horse,
  CocoLabel::Sheep,
  CocoLabel::Cow,
  CocoLabel::Elephant,
  CocoLabel::Bear,
  CocoLabel::Zebra,
  CocoLabel::Giraffe,
  CocoLabel::Backpack,
  CocoLabel::Umbrella,
  CocoLabel::Handbag,
  CocoLabel::Tie,
  CocoLabel::Suitcase,
  CocoLabel::Frisbee,
  CocoLabel::Skis,
  CocoLabel::Snowboard,
  CocoLabel::SportsBall,
  CocoLabel::Kite,
  CocoLabel::BaseballBat,
  CocoLabel::BaseballGlove,
  CocoLabel::Skateboard,
  CocoLabel::Surfboard,
  CocoLabel::TennisRacket,
  CocoLabel::Bottle,
  CocoLabel::WineGlass,
  CocoLabel::Cup,
  CocoLabel::Fork,
  CocoLabel::Knife,
  CocoLabel::Spoon,
  CocoLabel::Bowl,
  CocoLabel::Banana,
  CocoLabel::Apple,
  CocoLabel::Sandwich,
  CocoLabel::Orange,
  CocoLabel::Broccoli,
  CocoLabel::Carrot,
  CocoLabel::HotDog,
  CocoLabel::Pizza,
  CocoLabel::Donut,
  CocoLabel::Cake,
  CocoLabel::Chair,
  CocoLabel::Couch,
  CocoLabel::PottedPlant,
  CocoLabel::Bed,
  CocoLabel::DiningTable,
  CocoLabel::Toilet,
  CocoLabel::Tv,
  CocoLabel::Laptop,
  CocoLabel::Mouse,
  CocoLabel::Remote,
  CocoLabel::Keyboard,
  CocoLabel::CellPhone,
  CocoLabel::Microwave,
  CocoLabel::Oven,
  CocoLabel::Toaster,
  CocoLabel::Sink,
  CocoLabel::Refrigerator,
  CocoLabel::Book,
  CocoLabel::Clock,
  CocoLabel::Vase,
  CocoLabel::Scissors,
  CocoLabel::TeddyBear,
  CocoLabel::HairDrier,
  CocoLabel::Toothbrush,
];

impl WithLabel for CocoLabel {
  fn to_label_str(&self) -> String {
    COCO_CLASS_NAMES[*self as usize].to_string()
  }

  fn to_label_id(&self) -> u32 {
    *self as u32
  }

  fn from_label_id(id: u32) -> Option<Self> {
    COCO_LABELS.get(id as usize).copied()
  }
}

impl CocoLabel {
  /// SSD 检测图输出的类别 id 转标签
  ///
  /// 该 id 空间为 1 至 90、带空洞（12、26、29 等处无类别），
  /// 即 COCO 数据集的 90 类标注空间；空洞处返回 None。
  pub fn from_ssd_class_id(id: u32) -> Option<Self> {
    let label = match id {
      1 => CocoLabel::Person,
      2 => CocoLabel::Bicycle,
      3 => CocoLabel::Car,
      4 => CocoLabel::Motorcycle,
      5 => CocoLabel::Airplane,
      6 => CocoLabel::Bus,
      7 => CocoLabel::Train,
      8 => CocoLabel::Truck,
      9 => CocoLabel::Boat,
      10 => CocoLabel::TrafficLight,
      11 => CocoLabel::FireHydrant,
      13 => CocoLabel::StopSign,
      14 => CocoLabel::ParkingMeter,
      15 => CocoLabel::Bench,
      16 => CocoLabel::Bird,
      17 => CocoLabel::Cat,
      18 => CocoLabel::Dog,
      19 => CocoLabel::Horse,
      20 => CocoLabel::Sheep,
      21 => CocoLabel::Cow,
      22 => CocoLabel::Elephant,
      23 => CocoLabel::Bear,
      24 => CocoLabel::Zebra,
      25 => CocoLabel::Giraffe,
      27 => CocoLabel::Backpack,
      28 => CocoLabel::Umbrella,
      31 => CocoLabel::Handbag,
      32 => CocoLabel::Tie,
      33 => CocoLabel::Suitcase,
      34 => CocoLabel::Frisbee,
      35 => CocoLabel::Skis,
      36 => CocoLabel::Snowboard,
      37 => CocoLabel::SportsBall,
      38 => CocoLabel::Kite,
      39 => CocoLabel::BaseballBat,
      40 => CocoLabel::BaseballGlove,
      41 => CocoLabel::Skateboard,
      42 => CocoLabel::Surfboard,
      43 => CocoLabel::TennisRacket,
      44 => CocoLabel::Bottle,
      46 => CocoLabel::WineGlass,
      47 => CocoLabel::Cup,
      48 => CocoLabel::Fork,
      49 => CocoLabel::Knife,
      50 => CocoLabel::Spoon,
      51 => CocoLabel::Bowl,
      52 => CocoLabel::Banana,
      53 => CocoLabel::Apple,
      54 => CocoLabel::Sandwich,
      55 => CocoLabel::Orange,
      56 => CocoLabel::Broccoli,
      57 => CocoLabel::Carrot,
      58 => CocoLabel::HotDog,
      59 => CocoLabel::Pizza,
      60 => CocoLabel::Donut,
      61 => CocoLabel::Cake,
      62 => CocoLabel::Chair,
      63 => CocoLabel::Couch,
      64 => CocoLabel::PottedPlant,
      65 => CocoLabel::Bed,
      67 => CocoLabel::DiningTable,
      70 => CocoLabel::Toilet,
      72 => CocoLabel::Tv,
      73 => CocoLabel::Laptop,
      74 => CocoLabel::Mouse,
      75 => CocoLabel::Remote,
      76 => CocoLabel::Keyboard,
      77 => CocoLabel::CellPhone,
      78 => CocoLabel::Microwave,
      79 => CocoLabel::Oven,
      80 => CocoLabel::Toaster,
      81 => CocoLabel::Sink,
      82 => CocoLabel::Refrigerator,
      84 => CocoLabel::Book,
      85 => CocoLabel::Clock,
      86 => CocoLabel::Vase,
      87 => CocoLabel::Scissors,
      88 => CocoLabel::TeddyBear,
      89 => CocoLabel::HairDrier,
      90 => CocoLabel::Toothbrush,
      _ => return None,
    };
    Some(label)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_label_id_roundtrip() {
    for id in 0..80u32 {
      let label = CocoLabel::from_label_id(id).unwrap();
      assert_eq!(label.to_label_id(), id);
    }
    assert!(CocoLabel::from_label_id(80).is_none());
  }

  #[test]
  fn test_label_strings() {
    assert_eq!(CocoLabel::Person.to_label_str(), "person");
    assert_eq!(CocoLabel::TrafficLight.to_label_str(), "traffic light");
    assert_eq!(CocoLabel::Toothbrush.to_label_str(), "toothbrush");
  }

  #[test]
  fn test_table_order_matches_ids() {
    for (index, label) in COCO_LABELS.iter().enumerate() {
      assert_eq!(label.to_label_id() as usize, index);
      assert_eq!(label.to_label_str(), COCO_CLASS_NAMES[index]);
    }
  }

  #[test]
  fn test_ssd_class_id_mapping() {
    assert_eq!(CocoLabel::from_ssd_class_id(1), Some(CocoLabel::Person));
    assert_eq!(CocoLabel::from_ssd_class_id(44), Some(CocoLabel::Bottle));
    assert_eq!(CocoLabel::from_ssd_class_id(90), Some(CocoLabel::Toothbrush));
    // 标签表空洞与越界
    assert_eq!(CocoLabel::from_ssd_class_id(0), None);
    assert_eq!(CocoLabel::from_ssd_class_id(12), None);
    assert_eq!(CocoLabel::from_ssd_class_id(83), None);
    assert_eq!(CocoLabel::from_ssd_class_id(91), None);
  }
}
