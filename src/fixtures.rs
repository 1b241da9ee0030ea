//! Sample pages for tests, trimmed to the structures the built-in map reads.

pub const SCHEDULE_INDEX_HTML: &str = r#"
<html><body>
<div class="table1">
  <table>
    <thead><tr><th>レース場</th><th>開催</th></tr></thead>
    <tbody>
      <tr><td class="is-arrow1"><a href="/owpc/pc/race/raceindex?jcd=01&amp;hd=20250427"><img alt="桐生"></a></td><td class="is-raceCount">12R</td></tr>
    </tbody>
    <tbody>
      <tr><td class="is-arrow1"><a href="/owpc/pc/race/raceindex?jcd=04&amp;hd=20250427"><img alt="平和島"></a></td><td class="is-raceCount">8R</td></tr>
    </tbody>
    <tbody>
      <tr><td class="is-arrow1"><a href="/owpc/pc/race/raceindex?jcd=12&amp;hd=20250427"><img alt="住之江"></a></td><td class="is-raceCount">12R</td></tr>
    </tbody>
    <tbody>
      <tr><td colspan="2">ナイター</td></tr>
    </tbody>
  </table>
</div>
</body></html>
"#;

pub const ENTRY_LIST_HTML: &str = r#"
<html><body>
<div class="table1 h-mt10">
  <table>
    <thead><tr><th></th><th>1R</th><th>2R</th><th>3R</th><th>4R</th><th>5R</th><th>6R</th><th>7R</th><th>8R</th><th>9R</th><th>10R</th><th>11R</th><th>12R</th></tr></thead>
    <tbody>
      <tr><td>締切予定時刻</td><td>10:45</td><td>11:12</td><td>11:40</td><td>12:09</td><td>12:38</td><td>13:08</td><td>13:38</td><td>14:09</td><td>14:40</td><td>15:12</td><td>15:45</td><td>16:20</td></tr>
    </tbody>
  </table>
</div>
<div class="title16 is-type1">
  <h3 class="title16_titleDetail__add2020">一般　　　　1800m</h3>
  <div class="title16_titleLabels__add2020"><span class="label2 is-type1">安定板使用</span></div>
</div>
<div class="table1 is-tableFixed__3rdadd">
  <table>
    <tbody class="is-fs12">
      <tr>
        <td class="is-boatColor1 is-fs14" rowspan="4">１</td>
        <td rowspan="4"><img src="/racerphoto/4320.jpg"></td>
        <td rowspan="4">
          <div class="is-fs11">4320 / <span class="is-fColor1">A1</span></div>
          <div class="is-fs18 is-fBold"><a href="/owpc/pc/data/racersearch/profile?toban=4320">峰　竜太</a></div>
          <div class="is-fs11">佐賀/佐賀<br>39歳/52.0kg</div>
        </td>
        <td rowspan="4" class="is-lineH2">F0<br>L0<br>0.13</td>
        <td rowspan="4" class="is-lineH2">7.85<br>65.12<br>80.50</td>
        <td rowspan="4" class="is-lineH2">6.90<br>55.00<br>70.00</td>
        <td rowspan="4" class="is-lineH2">23<br>40.11<br>55.20</td>
        <td rowspan="4" class="is-lineH2">45<br>35.00<br>50.00</td>
      </tr>
      <tr><td>1</td></tr><tr><td></td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr>
        <td class="is-boatColor2 is-fs14" rowspan="4">２</td>
        <td rowspan="4"><img src="/racerphoto/4444.jpg"></td>
        <td rowspan="4">
          <div class="is-fs11">4444 / <span>A1</span></div>
          <div class="is-fs18 is-fBold"><a href="/owpc/pc/data/racersearch/profile?toban=4444">桐生　順平</a></div>
          <div class="is-fs11">埼玉/福島<br>38歳/51.5kg</div>
        </td>
        <td rowspan="4" class="is-lineH2">F1<br>L0<br>0.15</td>
        <td rowspan="4" class="is-lineH2">7.20<br>52.30<br>70.10</td>
        <td rowspan="4" class="is-lineH2">6.55<br>48.00<br>66.67</td>
        <td rowspan="4" class="is-lineH2">51<br>33.80<br>48.90</td>
        <td rowspan="4" class="is-lineH2">12<br>30.12<br>44.40</td>
      </tr>
      <tr><td>2</td></tr><tr><td></td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr>
        <td class="is-boatColor3 is-fs14" rowspan="4">３</td>
        <td rowspan="4"><img src="/racerphoto/3960.jpg"></td>
        <td rowspan="4">
          <div class="is-fs11">3960 / <span>A2</span></div>
          <div class="is-fs18 is-fBold"><a href="/owpc/pc/data/racersearch/profile?toban=3960">菊地　孝平</a></div>
          <div class="is-fs11">静岡/静岡<br>46歳/53.0kg</div>
        </td>
        <td rowspan="4" class="is-lineH2">F0<br>L1<br>0.12</td>
        <td rowspan="4" class="is-lineH2">6.40<br>45.00<br>61.20</td>
        <td rowspan="4" class="is-lineH2">5.80<br>40.00<br>55.00</td>
        <td rowspan="4" class="is-lineH2">37<br>29.50<br>45.00</td>
        <td rowspan="4" class="is-lineH2">60<br>31.00<br>47.70</td>
      </tr>
      <tr><td>3</td></tr><tr><td></td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr>
        <td class="is-boatColor4 is-fs14" rowspan="4">４</td>
        <td rowspan="4"><img src="/racerphoto/5036.jpg"></td>
        <td rowspan="4">
          <div class="is-fs11">5036 / <span>B1</span></div>
          <div class="is-fs18 is-fBold"><a href="/owpc/pc/data/racersearch/profile?toban=5036">佐藤　翼</a></div>
          <div class="is-fs11">東京/東京<br>27歳/50.8kg</div>
        </td>
        <td rowspan="4" class="is-lineH2">F0<br>L0<br>0.17</td>
        <td rowspan="4" class="is-lineH2">5.10<br>30.00<br>45.50</td>
        <td rowspan="4" class="is-lineH2">4.90<br>28.00<br>40.00</td>
        <td rowspan="4" class="is-lineH2">18<br>35.10<br>52.00</td>
        <td rowspan="4" class="is-lineH2">33<br>28.40<br>41.30</td>
      </tr>
      <tr><td>4</td></tr><tr><td></td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr>
        <td class="is-boatColor5 is-fs14" rowspan="4">５</td>
        <td rowspan="4"><img src="/racerphoto/4686.jpg"></td>
        <td rowspan="4">
          <div class="is-fs11">4686 / <span>A2</span></div>
          <div class="is-fs18 is-fBold"><a href="/owpc/pc/data/racersearch/profile?toban=4686">丸野　一樹</a></div>
          <div class="is-fs11">滋賀/滋賀<br>33歳/52.5kg</div>
        </td>
        <td rowspan="4" class="is-lineH2">F0<br>L0<br>0.14</td>
        <td rowspan="4" class="is-lineH2">6.10<br>41.00<br>58.00</td>
        <td rowspan="4" class="is-lineH2">5.50<br>38.00<br>52.00</td>
        <td rowspan="4" class="is-lineH2">42<br>38.40<br>56.10</td>
        <td rowspan="4" class="is-lineH2">27<br>32.00<br>46.00</td>
      </tr>
      <tr><td>5</td></tr><tr><td></td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr>
        <td class="is-boatColor6 is-fs14" rowspan="4">６</td>
        <td rowspan="4"><img src="/racerphoto/5112.jpg"></td>
        <td rowspan="4">
          <div class="is-fs11">5112 / <span>B2</span></div>
          <div class="is-fs18 is-fBold"><a href="/owpc/pc/data/racersearch/profile?toban=5112">新人　太郎</a></div>
          <div class="is-fs11">大阪/兵庫<br>21歳/－</div>
        </td>
        <td rowspan="4" class="is-lineH2">F0<br>L0<br>-.--</td>
        <td rowspan="4" class="is-lineH2">１.５０<br>5.00<br>10.00</td>
        <td rowspan="4" class="is-lineH2">0.00<br>0.00<br>0.00</td>
        <td rowspan="4" class="is-lineH2">66<br>30.00<br>42.00</td>
        <td rowspan="4" class="is-lineH2">71<br>29.00<br>40.00</td>
      </tr>
      <tr><td>6</td></tr><tr><td></td></tr><tr><td></td></tr>
    </tbody>
  </table>
</div>
</body></html>
"#;

pub const PRE_RACE_HTML: &str = r#"
<html><body>
<div class="table1">
  <table class="is-w748">
    <tbody class="is-fs12">
      <tr><td class="is-boatColor1" rowspan="4">1</td><td rowspan="4"><img></td><td rowspan="2"><a>峰　竜太</a></td><td rowspan="2">52.5kg</td><td rowspan="4">6.72</td><td rowspan="4">-0.5</td><td rowspan="4"></td><td rowspan="4"><ul class="labelGroup1"><li><span class="label4 is-type1">リング</span></li><li><span class="label4 is-type1">ピストン</span></li></ul></td></tr>
      <tr><td>R</td></tr><tr><td>0.0</td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr><td class="is-boatColor2" rowspan="4">2</td><td rowspan="4"><img></td><td rowspan="2"><a>桐生　順平</a></td><td rowspan="2">51.5kg</td><td rowspan="4">6.80</td><td rowspan="4">0.0</td><td rowspan="4">新</td><td rowspan="4"><ul class="labelGroup1"></ul></td></tr>
      <tr><td>R</td></tr><tr><td>0.5</td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr><td class="is-boatColor3" rowspan="4">3</td><td rowspan="4"><img></td><td rowspan="2"><a>菊地　孝平</a></td><td rowspan="2">53.0kg</td><td rowspan="4">6.75</td><td rowspan="4">0.5</td><td rowspan="4"></td><td rowspan="4"></td></tr>
      <tr><td>R</td></tr><tr><td>0.0</td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr><td class="is-boatColor4" rowspan="4">4</td><td rowspan="4"><img></td><td rowspan="2"><a>佐藤　翼</a></td><td rowspan="2">50.8kg</td><td rowspan="4">6.85</td><td rowspan="4">-0.5</td><td rowspan="4"></td><td rowspan="4"></td></tr>
      <tr><td>R</td></tr><tr><td>1.0</td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr><td class="is-boatColor5" rowspan="4">5</td><td rowspan="4"><img></td><td rowspan="2"><a>丸野　一樹</a></td><td rowspan="2">52.4kg</td><td rowspan="4">6.78</td><td rowspan="4">0.0</td><td rowspan="4"></td><td rowspan="4"></td></tr>
      <tr><td>R</td></tr><tr><td>0.0</td></tr><tr><td></td></tr>
    </tbody>
    <tbody class="is-fs12">
      <tr><td class="is-boatColor6" rowspan="4">6</td><td rowspan="4"><img></td><td rowspan="2"><a>新人　太郎</a></td><td rowspan="2">49.9kg</td><td rowspan="4">6.95</td><td rowspan="4">0.5</td><td rowspan="4"></td><td rowspan="4"></td></tr>
      <tr><td>R</td></tr><tr><td>2.0</td></tr><tr><td></td></tr>
    </tbody>
  </table>
</div>
<div class="table1">
  <table class="is-w238">
    <tbody>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type2">2</span><span class="table1_boatImage1Time is-fColor1">F.03</span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type1">1</span><span class="table1_boatImage1Time">.11</span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type3">3</span><span class="table1_boatImage1Time">.09</span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type4">4</span><span class="table1_boatImage1Time">.14</span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type5">5</span><span class="table1_boatImage1Time">.20</span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type6">6</span><span class="table1_boatImage1Time">.18</span></div></td></tr>
    </tbody>
  </table>
</div>
<div class="weather1">
  <div class="weather1_body">
    <div class="weather1_bodyUnit is-direction"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">気温</span><span class="weather1_bodyUnitLabelData">18.0℃</span></div></div>
    <div class="weather1_bodyUnit is-weather"><p class="weather1_bodyUnitImage is-weather2"></p><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">曇り</span></div></div>
    <div class="weather1_bodyUnit is-wind"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">風速</span><span class="weather1_bodyUnitLabelData">3m</span></div></div>
    <div class="weather1_bodyUnit is-windDirection"><p class="weather1_bodyUnitImage is-wind5"></p></div>
    <div class="weather1_bodyUnit is-waterTemperature"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">水温</span><span class="weather1_bodyUnitLabelData">17.0℃</span></div></div>
    <div class="weather1_bodyUnit is-wave"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">波高</span><span class="weather1_bodyUnitLabelData">3cm</span></div></div>
  </div>
</div>
</body></html>
"#;

pub const RESULT_HTML: &str = r#"
<html><body>
<div class="grid is-type2 h-clear h-mt10">
<div class="table1">
  <table class="is-w495">
    <thead><tr><th>着</th><th>枠</th><th>ボートレーサー</th><th>レースタイム</th></tr></thead>
    <tbody><tr><td class="is-fs14">１</td><td class="is-fs14 is-boatColor1">1</td><td><span class="is-fs12">4320</span><span class="is-fs18 is-fBold">峰　竜太</span></td><td>1'49"8</td></tr></tbody>
    <tbody><tr><td class="is-fs14">２</td><td class="is-fs14 is-boatColor3">3</td><td><span class="is-fs12">3960</span><span class="is-fs18 is-fBold">菊地　孝平</span></td><td>1'51"2</td></tr></tbody>
    <tbody><tr><td class="is-fs14">３</td><td class="is-fs14 is-boatColor2">2</td><td><span class="is-fs12">4444</span><span class="is-fs18 is-fBold">桐生　順平</span></td><td>1'52"0</td></tr></tbody>
    <tbody><tr><td class="is-fs14">４</td><td class="is-fs14 is-boatColor5">5</td><td><span class="is-fs12">4686</span><span class="is-fs18 is-fBold">丸野　一樹</span></td><td>1'53"5</td></tr></tbody>
    <tbody><tr><td class="is-fs14">５</td><td class="is-fs14 is-boatColor6">6</td><td><span class="is-fs12">5112</span><span class="is-fs18 is-fBold">新人　太郎</span></td><td>1'55"1</td></tr></tbody>
    <tbody><tr><td class="is-fs14">Ｆ</td><td class="is-fs14 is-boatColor4">4</td><td><span class="is-fs12">5036</span><span class="is-fs18 is-fBold">佐藤　翼</span></td><td></td></tr></tbody>
  </table>
</div>
<div class="table1">
  <table class="is-w495 is-h292__3rdadd">
    <tbody>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type1">1</span><span class="table1_boatImage1Time"><span class="table1_boatImage1TimeInner">.08   逃げ</span></span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type2">2</span><span class="table1_boatImage1Time"><span class="table1_boatImage1TimeInner">.12</span></span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type3">3</span><span class="table1_boatImage1Time"><span class="table1_boatImage1TimeInner">.10</span></span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type4">4</span><span class="table1_boatImage1Time"><span class="table1_boatImage1TimeInner">F.01</span></span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type5">5</span><span class="table1_boatImage1Time"><span class="table1_boatImage1TimeInner">.15</span></span></div></td></tr>
      <tr><td><div class="table1_boatImage1"><span class="table1_boatImage1Number is-type6">6</span><span class="table1_boatImage1Time"><span class="table1_boatImage1TimeInner">.18</span></span></div></td></tr>
    </tbody>
  </table>
</div>
</div>
<div class="grid is-type2 h-clear">
<div class="table1">
  <table class="is-w495">
    <thead><tr><th>勝式</th><th>組番</th><th>払戻金</th><th>人気</th></tr></thead>
    <tbody>
      <tr><td rowspan="2" class="is-fBold">3連単</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span><span class="numberSet1_text">-</span><span class="numberSet1_number is-type3">3</span><span class="numberSet1_text">-</span><span class="numberSet1_number is-type2">2</span></div></div></td><td><span class="is-payout1">¥1,230</span></td><td>4</td></tr>
      <tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td></tr>
    </tbody>
    <tbody>
      <tr><td rowspan="2" class="is-fBold">3連複</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span><span class="numberSet1_text">=</span><span class="numberSet1_number is-type2">2</span><span class="numberSet1_text">=</span><span class="numberSet1_number is-type3">3</span></div></div></td><td><span class="is-payout1">¥450</span></td><td>2</td></tr>
      <tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td></tr>
    </tbody>
    <tbody>
      <tr><td rowspan="2" class="is-fBold">2連単</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span><span class="numberSet1_text">-</span><span class="numberSet1_number is-type3">3</span></div></div></td><td><span class="is-payout1">¥560</span></td><td>3</td></tr>
      <tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td></tr>
    </tbody>
    <tbody>
      <tr><td rowspan="2" class="is-fBold">2連複</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span><span class="numberSet1_text">=</span><span class="numberSet1_number is-type3">3</span></div></div></td><td><span class="is-payout1">¥340</span></td><td>2</td></tr>
      <tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td></tr>
    </tbody>
    <tbody>
      <tr><td rowspan="3" class="is-fBold">拡連複</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span><span class="numberSet1_text">=</span><span class="numberSet1_number is-type3">3</span></div></div></td><td><span class="is-payout1">¥150</span></td><td>2</td></tr>
      <tr><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span><span class="numberSet1_text">=</span><span class="numberSet1_number is-type2">2</span></div></div></td><td><span class="is-payout1">¥200</span></td><td>3</td></tr>
      <tr><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type2">2</span><span class="numberSet1_text">=</span><span class="numberSet1_number is-type3">3</span></div></div></td><td><span class="is-payout1">¥310</span></td><td>5</td></tr>
    </tbody>
    <tbody>
      <tr><td rowspan="2" class="is-fBold">単勝</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span></div></div></td><td><span class="is-payout1">¥130</span></td><td></td></tr>
      <tr><td>&nbsp;</td><td>&nbsp;</td><td>&nbsp;</td></tr>
    </tbody>
    <tbody>
      <tr><td rowspan="2" class="is-fBold">複勝</td><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type1">1</span></div></div></td><td><span class="is-payout1">¥100</span></td><td></td></tr>
      <tr><td><div class="numberSet1"><div class="numberSet1_row"><span class="numberSet1_number is-type3">3</span></div></div></td><td><span class="is-payout1">¥140</span></td><td></td></tr>
    </tbody>
  </table>
</div>
<div class="table1">
  <table class="is-w243 is-h108__3rdadd">
    <thead><tr><th>決まり手</th></tr></thead>
    <tbody><tr><td class="is-fs16">逃げ</td></tr></tbody>
  </table>
</div>
</div>
<div class="weather1">
  <div class="weather1_body">
    <div class="weather1_bodyUnit is-direction"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">気温</span><span class="weather1_bodyUnitLabelData">19.0℃</span></div></div>
    <div class="weather1_bodyUnit is-weather"><p class="weather1_bodyUnitImage is-weather1"></p><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">晴</span></div></div>
    <div class="weather1_bodyUnit is-wind"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">風速</span><span class="weather1_bodyUnitLabelData">4m</span></div></div>
    <div class="weather1_bodyUnit is-windDirection"><p class="weather1_bodyUnitImage is-wind6"></p></div>
    <div class="weather1_bodyUnit is-waterTemperature"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">水温</span><span class="weather1_bodyUnitLabelData">17.5℃</span></div></div>
    <div class="weather1_bodyUnit is-wave"><div class="weather1_bodyUnitLabel"><span class="weather1_bodyUnitLabelTitle">波高</span><span class="weather1_bodyUnitLabelData">4cm</span></div></div>
  </div>
</div>
</body></html>
"#;

pub const NOT_PUBLISHED_HTML: &str = r#"
<html><body>
<div class="l-main"><p class="is-fs14">※ データはありません。</p></div>
</body></html>
"#;
